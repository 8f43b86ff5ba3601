//! End-to-end flows through the app state with scripted backends

mod common;

use common::{poll_until, Fakes, ScriptedGenerator, STARLIT_STORY};
use std::time::Duration;
use storytime::speech::{SpeechEvent, STORY_PITCH, STORY_RATE};
use storytime::story::{rate_limit_message, Mood, RequestPhase, StoryTheme, GENERIC_ERROR_MESSAGE};
use storytime::StorytimeError;

fn mia(state: &mut storytime::ui::AppState) {
    state.profile.name = "Mia".to_string();
    state.profile.mood = Mood::Sleepy;
    state.profile.theme = StoryTheme::Space;
}

#[test]
fn test_story_for_mia() {
    let fakes = Fakes::new(ScriptedGenerator::replying(Ok(STARLIT_STORY.to_string())));
    let mut state = fakes.app_state();
    mia(&mut state);

    assert!(state.request_story(std::time::Instant::now()));
    assert!(state.generation.is_generating());

    poll_until(&mut state, |s| !s.generation.is_generating());

    assert_eq!(state.generation.story(), STARLIT_STORY);
    assert_eq!(state.generation.error_message(), "");
    assert_eq!(state.generation.phase(), RequestPhase::Idle);

    let prompts = fakes.generator.prompts.lock();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].starts_with(
        "Create a short, engaging bedtime story for a child named Mia who is feeling sleepy."
    ));
    assert!(prompts[0].contains("themed around space"));
}

#[test]
fn test_rate_limit_starts_cooldown() {
    let fakes = Fakes::new(ScriptedGenerator::replying(Err(StorytimeError::GenerationError(
        "[429 Too Many Requests] Resource has been exhausted".into(),
    ))));
    let mut state = fakes.app_state();
    mia(&mut state);

    state.request_story(std::time::Instant::now());
    let failed_at = poll_until(&mut state, |s| !s.generation.is_generating());

    assert_eq!(state.generation.error_message(), rate_limit_message(60));
    assert_eq!(state.generation.cooldown_seconds(), 60);
    assert_eq!(state.generation.story(), "");
    assert!(!state.can_request_story());

    // Requests are ignored while cooling down
    assert!(!state.request_story(failed_at));
    assert_eq!(fakes.generator.calls(), 1);

    state.poll_events(failed_at + Duration::from_secs(1));
    assert_eq!(state.generation.cooldown_seconds(), 59);

    state.poll_events(failed_at + Duration::from_secs(60));
    assert_eq!(state.generation.cooldown_seconds(), 0);
    assert_eq!(state.generation.error_message(), "");
    assert!(state.can_request_story());
}

#[test]
fn test_other_failure_shows_generic_message() {
    let fakes = Fakes::new(ScriptedGenerator::replying(Err(StorytimeError::GenerationError(
        "[500 Internal Server Error] boom".into(),
    ))));
    let mut state = fakes.app_state();
    mia(&mut state);

    state.request_story(std::time::Instant::now());
    poll_until(&mut state, |s| !s.generation.is_generating());

    assert_eq!(state.generation.error_message(), GENERIC_ERROR_MESSAGE);
    assert_eq!(state.generation.cooldown_seconds(), 0);
    assert!(state.can_request_story());
}

#[test]
fn test_single_request_in_flight() {
    let generator = ScriptedGenerator::replying(Ok(STARLIT_STORY.to_string()))
        .with_delay(Duration::from_millis(200));
    let fakes = Fakes::new(generator);
    let mut state = fakes.app_state();
    mia(&mut state);

    let now = std::time::Instant::now();
    assert!(state.request_story(now));
    assert!(!state.request_story(now));

    poll_until(&mut state, |s| !s.generation.is_generating());
    assert_eq!(fakes.generator.calls(), 1);
}

#[test]
fn test_request_needs_a_name() {
    let fakes = Fakes::new(ScriptedGenerator::default());
    let mut state = fakes.app_state();
    state.profile.name = "   ".to_string();

    assert!(!state.request_story(std::time::Instant::now()));
    assert_eq!(state.generation.phase(), RequestPhase::Idle);
    assert_eq!(fakes.generator.calls(), 0);
}

#[test]
fn test_read_story_aloud() {
    let fakes = Fakes::new(ScriptedGenerator::replying(Ok(STARLIT_STORY.to_string())));
    let mut state = fakes.app_state();
    mia(&mut state);

    state.request_story(std::time::Instant::now());
    poll_until(&mut state, |s| !s.generation.story().is_empty());

    state.toggle_reading();
    let id = {
        let spoken = fakes.speech.spoken.lock();
        assert_eq!(spoken.len(), 1);
        assert_eq!(spoken[0].text, STARLIT_STORY);
        assert_eq!(spoken[0].voice.as_ref().map(|v| v.name.as_str()), Some("en_US-female"));
        assert_eq!(spoken[0].pitch, STORY_PITCH);
        assert_eq!(spoken[0].rate, STORY_RATE);
        spoken[0].id
    };

    fakes.speech.events.lock().push_back(SpeechEvent::Started { id });
    state.poll_events(std::time::Instant::now());
    assert!(state.narrator.is_speaking());

    // Second toggle stops reading
    state.toggle_reading();
    assert!(!state.narrator.is_speaking());
    assert_eq!(*fakes.speech.cancels.lock(), 1);
}

#[test]
fn test_feelings_flow_reports_emotion() {
    let fakes = Fakes::new(ScriptedGenerator::default());
    let mut state = fakes.app_state();

    assert!(state.emotion.submit_feelings("I feel lonely"));
    poll_until(&mut state, |s| !s.emotion.is_loading());

    assert_eq!(*fakes.emotion.detect_calls.lock(), vec!["I feel lonely".to_string()]);
    assert_eq!(*fakes.emotion.story_calls.lock(), vec!["sad".to_string()]);
    assert_eq!(state.emotion.detected_emotion(), "sad");
    assert_eq!(state.detected_emotion(), "sad");
    assert_eq!(state.emotion.story(), "A gentle story for feeling sad.");

    state.emotion.toggle_playback();
    assert!(state.emotion.is_playing());
    assert_eq!(
        *fakes.playback.calls.lock(),
        vec!["load http://localhost:5000/audio/story.mp3".to_string(), "play".to_string()]
    );
}
