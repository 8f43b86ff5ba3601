//! UI automation tests using egui_kittest and AccessKit
//!
//! These tests render the story window's components against scripted
//! backends, drive them through accessibility labels and check the state.

mod common;

use common::{Fakes, ScriptedGenerator, STARLIT_STORY};
use egui_kittest::kittest::Queryable;
use egui_kittest::Harness;
use std::time::{Duration, Instant};
use storytime::story::{Mood, StoryTheme};
use storytime::ui::components::{EmotionPanel, ProfileForm, StoryCard};
use storytime::ui::{AppState, Theme};

/// Application state wrapper for testing
struct TestApp {
    state: AppState,
    theme: Theme,
}

impl TestApp {
    fn new(fakes: &Fakes) -> Self {
        Self {
            state: fakes.app_state(),
            theme: Theme::night(),
        }
    }

    fn named(mut self, name: &str) -> Self {
        self.state.profile.name = name.to_string();
        self
    }
}

/// Render the story window body the way the app lays it out
fn render_story_ui(app: &mut TestApp, ui: &mut egui::Ui) {
    app.state.poll_events(Instant::now());

    egui::ScrollArea::vertical().show(ui, |ui| {
        EmotionPanel::new(&mut app.state.emotion, &app.theme).show(ui);
        ui.separator();
        ProfileForm::new(&mut app.state.profile, &app.theme).show(ui);
        StoryCard::new(&mut app.state, &app.theme).show(ui);
    });
}

fn harness(app: TestApp) -> Harness<'static, TestApp> {
    Harness::builder()
        .with_size(egui::Vec2::new(600.0, 1200.0))
        .build_state(
            |ctx, app: &mut TestApp| {
                egui::CentralPanel::default().show(ctx, |ui| {
                    render_story_ui(app, ui);
                });
            },
            app,
        )
}

/// Run frames until `done` holds, giving the workers time to answer
fn run_until(harness: &mut Harness<'static, TestApp>, done: impl Fn(&TestApp) -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !done(harness.state()) {
        assert!(Instant::now() < deadline, "UI did not settle in time");
        std::thread::sleep(Duration::from_millis(10));
        harness.run();
    }
}

/// Test that the name input exists and accepts text
#[test]
fn test_type_name() {
    let fakes = Fakes::new(ScriptedGenerator::default());
    let mut harness = harness(TestApp::new(&fakes));
    harness.run();

    harness.get_by_label("Name input").focus();
    harness.run();

    harness.get_by_label("Name input").type_text("Mia");
    harness.run();

    assert_eq!(harness.state().state.profile.name, "Mia");
}

/// Test that mood and theme buttons update the profile
#[test]
fn test_pick_mood_and_theme() {
    let fakes = Fakes::new(ScriptedGenerator::default());
    let mut harness = harness(TestApp::new(&fakes));
    harness.run();

    harness.get_by_label("Mood: Sleepy").click();
    harness.run();
    harness.get_by_label("Theme: Space").click();
    harness.run();

    let profile = &harness.state().state.profile;
    assert_eq!(profile.mood, Mood::Sleepy);
    assert_eq!(profile.theme, StoryTheme::Space);
}

/// Test that the create button does nothing without a name
#[test]
fn test_create_disabled_without_name() {
    let fakes = Fakes::new(ScriptedGenerator::default());
    let mut harness = harness(TestApp::new(&fakes));
    harness.run();

    harness.get_by_label("Create story").click();
    harness.run();

    assert!(!harness.state().state.generation.is_generating());
    assert_eq!(fakes.generator.calls(), 0);
}

/// Test the complete flow: pick a theme, create, read the story card
#[test]
fn test_create_story_flow() {
    let fakes = Fakes::new(ScriptedGenerator::replying(Ok(STARLIT_STORY.to_string())));
    let mut harness = harness(TestApp::new(&fakes).named("Mia"));
    harness.run();

    harness.get_by_label("Mood: Sleepy").click();
    harness.run();
    harness.get_by_label("Create story").click();
    harness.run();

    run_until(&mut harness, |app| !app.state.generation.story().is_empty());

    let _story = harness.get_by_label(&format!("Story: {}", STARLIT_STORY));
    let _read = harness.get_by_label("Read Story");
    assert_eq!(fakes.generator.calls(), 1);
}

/// Test that the error banner appears after a failed request
#[test]
fn test_error_banner() {
    let fakes = Fakes::new(ScriptedGenerator::replying(Err(
        storytime::StorytimeError::GenerationError("[429 Too Many Requests] quota".into()),
    )));
    let mut harness = harness(TestApp::new(&fakes).named("Mia"));
    harness.run();

    harness.get_by_label("Create story").click();
    harness.run();

    run_until(&mut harness, |app| !app.state.generation.error_message().is_empty());

    let _banner = harness.get_by_label("Story error");
    assert_eq!(harness.state().state.generation.cooldown_seconds(), 60);
}

/// Test the feelings panel from typing to the detected emotion
#[test]
fn test_feelings_panel_flow() {
    let fakes = Fakes::new(ScriptedGenerator::default());
    let mut harness = harness(TestApp::new(&fakes));
    harness.run();

    harness.get_by_label("Feelings input").focus();
    harness.run();
    harness.get_by_label("Feelings input").type_text("I feel lonely");
    harness.run();

    harness.get_by_label("Generate feelings story").click();
    harness.run();

    run_until(&mut harness, |app| !app.state.emotion.story().is_empty());

    let _emotion = harness.get_by_label("Detected emotion: sad");
    harness.get_by_label("Play story audio").click();
    harness.run();

    assert!(harness.state().state.emotion.is_playing());
    let _pause = harness.get_by_label("Pause story audio");
    assert_eq!(harness.state().state.detected_emotion(), "sad");
}
