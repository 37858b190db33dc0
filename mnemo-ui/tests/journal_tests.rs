//! Memory viewing and editing through the journal

mod helpers;

use helpers::{controller, memory, names, standard_backend};
use mnemo_ui::audio::PlaybackMode;
use mnemo_ui::journal::{AudioBlock, EditorForm, EditorMode, Journal};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_view_with_stale_playlist_keeps_global_music() {
    let backend = standard_backend();
    backend.add_memory(memory("m1", &["x.mp3"]));
    let (audio, _output) = controller(backend);
    let journal = Journal::new(Arc::clone(&audio));

    let view = journal.view_memory("m1").await.unwrap().unwrap();
    assert_eq!(view.audio, AudioBlock::NoDedicatedMusic);
    assert_eq!(view.emotion_label, "怀念");
    assert_eq!(audio.session().await.mode(), PlaybackMode::Global);
    assert!(audio.now_playing().await.is_empty());
}

#[tokio::test]
async fn test_view_switches_to_memory_music_and_close_restores() {
    let backend = standard_backend();
    backend.add_memory(memory("m1", &["c.mp3", "gone.mp3", "a.mp3"]));
    let (audio, _output) = controller(backend);
    let journal = Journal::new(Arc::clone(&audio));

    let view = journal.view_memory("m1").await.unwrap().unwrap();
    assert_eq!(view.audio, AudioBlock::Tracks(names(&["1. c", "2. a"])));
    assert_eq!(audio.session().await.mode(), PlaybackMode::Memory);
    assert_eq!(audio.current_track().await.as_deref(), Some("c.mp3"));
    assert_eq!(audio.now_playing().await, names(&["> 1. c", "  2. a"]));

    assert!(journal.close_view().await);
    assert_eq!(audio.session().await.mode(), PlaybackMode::Global);
    assert!(!journal.close_view().await);
}

#[tokio::test(start_paused = true)]
async fn test_slow_view_is_discarded_when_a_newer_one_starts() {
    let backend = standard_backend();
    backend.add_memory(memory("slow", &["a.mp3"]));
    backend.add_memory(memory("fast", &["b.mp3"]));
    backend
        .state()
        .memory_delays
        .insert("slow".to_string(), Duration::from_millis(100));
    let (audio, _output) = controller(backend);
    let journal = Journal::new(Arc::clone(&audio));

    let (slow, fast) = tokio::join!(journal.view_memory("slow"), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        journal.view_memory("fast").await
    });

    assert!(slow.unwrap().is_none());
    assert_eq!(fast.unwrap().unwrap().memory.id, "fast");
    let session = audio.session().await;
    let current = session.current_memory_playback.unwrap();
    assert_eq!(current.memory_id, "fast");
    assert_eq!(current.playlist, names(&["b.mp3"]));
}

#[tokio::test(start_paused = true)]
async fn test_close_while_view_is_loading_keeps_global_music() {
    let backend = standard_backend();
    backend.add_memory(memory("m1", &["c.mp3"]));
    backend
        .state()
        .memory_delays
        .insert("m1".to_string(), Duration::from_millis(100));
    let (audio, _output) = controller(backend);
    let journal = Journal::new(Arc::clone(&audio));

    let (view, closed) = tokio::join!(journal.view_memory("m1"), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        journal.close_view().await
    });

    assert!(view.unwrap().is_none());
    assert!(!closed);
    let session = audio.session().await;
    assert_eq!(session.mode(), PlaybackMode::Global);
    assert!(session.global_resume_state.is_none());
}

#[tokio::test]
async fn test_close_at_any_point_of_a_view_ends_in_global_mode() {
    for yields in 0..40 {
        let backend = standard_backend();
        backend.add_memory(memory("m1", &["c.mp3", "a.mp3"]));
        let (audio, _output) = controller(backend);
        audio.ensure_loaded().await.unwrap();
        let journal = Journal::new(Arc::clone(&audio));

        let (view, closed) = tokio::join!(journal.view_memory("m1"), async {
            for _ in 0..yields {
                tokio::task::yield_now().await;
            }
            journal.close_view().await
        });

        let session = audio.session().await;
        assert_eq!(session.mode(), PlaybackMode::Global, "after {} yields", yields);
        assert!(
            session.global_resume_state.is_none(),
            "resume snapshot left after {} yields",
            yields
        );
        if view.unwrap().is_some() {
            assert!(closed, "view opened but close found nothing after {} yields", yields);
        }
    }
}

#[tokio::test]
async fn test_missing_memory_reports_not_found() {
    let (audio, _output) = controller(standard_backend());
    let journal = Journal::new(audio);

    let err = journal.view_memory("nope").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_editor_add_starts_empty() {
    let (audio, _output) = controller(standard_backend());
    audio.set_memory_draft(&["a.mp3"]).await;
    let journal = Journal::new(Arc::clone(&audio));

    let form = journal.open_editor(EditorMode::Add).await.unwrap();
    assert_eq!(form.id, None);
    assert_eq!(form.emotion, "peaceful");
    assert!(form.title.is_empty() && form.content.is_empty());
    assert!(audio.memory_draft().await.is_empty());
}

#[tokio::test]
async fn test_editor_edit_loads_filtered_draft() {
    let backend = standard_backend();
    backend.add_memory(memory("m1", &["b.mp3", "gone.mp3"]));
    let (audio, _output) = controller(backend);
    let journal = Journal::new(Arc::clone(&audio));

    let form = journal
        .open_editor(EditorMode::Edit("m1".to_string()))
        .await
        .unwrap();
    assert_eq!(form.id.as_deref(), Some("m1"));
    assert_eq!(form.emotion, "nostalgic");
    assert_eq!(form.memory_date.as_deref(), Some("2023-08-14T07:30:00.000Z"));
    assert_eq!(audio.memory_draft().await, names(&["b.mp3"]));
}

#[tokio::test]
async fn test_save_sends_draft_and_defaults_blank_date() {
    let backend = standard_backend();
    let (audio, _output) = controller(backend.clone());
    let journal = Journal::new(Arc::clone(&audio));

    let mut form: EditorForm = journal.open_editor(EditorMode::Add).await.unwrap();
    audio.add_to_memory_draft(&names(&["c.mp3", "a.mp3"])).await;
    form.title = "Harbor".to_string();
    form.content = "Gulls over the pier.".to_string();
    form.memory_date = Some("   ".to_string());

    let saved = journal.save_memory(&form).await.unwrap();
    assert_eq!(saved.id, "mem-1");
    assert_eq!(saved.music_playlist, names(&["c.mp3", "a.mp3"]));

    let drafts = backend.state().saved_drafts.clone();
    assert_eq!(drafts.len(), 1);
    assert!(!drafts[0].memory_date.trim().is_empty());
    assert_ne!(drafts[0].memory_date, "   ");
}

#[tokio::test]
async fn test_timeline_and_delete() {
    let backend = standard_backend();
    backend.add_memory(memory("m1", &[]));
    backend.add_memory(memory("m2", &[]));
    let (audio, _output) = controller(backend);
    let journal = Journal::new(audio);

    let cards = journal.timeline().await.unwrap();
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0].offset_x, -70);
    assert_eq!(cards[1].offset_x, 30);
    assert_eq!(cards[0].date, "2023-08-14T07:30:00.000Z");

    journal.delete_memory("m1").await.unwrap();
    let remaining = journal.list_memories().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, "m2");
    assert_eq!(
        journal.delete_memory("m1").await.unwrap_err().status(),
        Some(404)
    );
}
