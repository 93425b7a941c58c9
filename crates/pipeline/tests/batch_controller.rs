//! Integration tests for `BatchController` with a scripted editor.
//!
//! Each input's bytes tell the scripted editor what to do, so a batch can
//! mix successes, service failures, hangs and panics. A semaphore gate
//! holds every edit until the test opens it, which makes the "all items
//! processing right after submit" state observable.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use prodshot_core::editor::{EditError, EditedImage, ImageEditor};
use prodshot_core::encoding::{decode_base64, encode_base64};
use prodshot_core::media::MediaType;
use prodshot_core::status::ItemStatus;
use prodshot_pipeline::controller::UNKNOWN_ERROR_MESSAGE;
use prodshot_pipeline::{BatchController, ItemTracker, PreviewRegistry, RawInput, TrackedItem};
use tokio::sync::Semaphore;

const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Scripted editor
// ---------------------------------------------------------------------------

/// Behaviour keyed on the input bytes:
///
/// - `fail:<msg>` → service failure with `<msg>`
/// - `empty`      → response without an image
/// - `panic`      → the task panics
/// - `hang`       → never answers
/// - anything else → success with payload `edited:<input>`
struct ScriptedEditor {
    gate: Option<Arc<Semaphore>>,
    finished: AtomicUsize,
}

impl ScriptedEditor {
    fn open() -> Arc<Self> {
        Arc::new(Self {
            gate: None,
            finished: AtomicUsize::new(0),
        })
    }

    fn gated(gate: Arc<Semaphore>) -> Arc<Self> {
        Arc::new(Self {
            gate: Some(gate),
            finished: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl ImageEditor for ScriptedEditor {
    async fn edit(
        &self,
        encoded_image: &str,
        _media_type: MediaType,
    ) -> Result<EditedImage, EditError> {
        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        let input = String::from_utf8(decode_base64(encoded_image).unwrap()).unwrap();
        let outcome = if let Some(msg) = input.strip_prefix("fail:") {
            Err(EditError::Failed(msg.to_string()))
        } else if input == "empty" {
            Err(EditError::no_image())
        } else if input == "panic" {
            panic!("scripted panic");
        } else if input == "hang" {
            std::future::pending::<()>().await;
            unreachable!()
        } else {
            Ok(expected_result(&input))
        };

        self.finished.fetch_add(1, Ordering::SeqCst);
        outcome
    }
}

fn expected_result(input: &str) -> EditedImage {
    EditedImage::new(encode_base64(format!("edited:{input}").as_bytes()), "image/png")
}

fn input(name: &str, script: &str) -> RawInput {
    RawInput::from_bytes(name, MediaType::Jpeg, script.as_bytes().to_vec())
}

async fn settle(tracker: &ItemTracker) {
    tokio::time::timeout(SETTLE_TIMEOUT, tracker.wait_settled())
        .await
        .expect("batch did not settle in time");
}

// ---------------------------------------------------------------------------
// Test: every item is processing immediately after submit
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submit_registers_every_item_as_processing() {
    let gate = Arc::new(Semaphore::new(0));
    let controller = BatchController::new(ScriptedEditor::gated(Arc::clone(&gate)));

    let ids = controller
        .submit(vec![
            input("a.jpg", "a"),
            input("b.jpg", "b"),
            input("c.jpg", "c"),
            input("d.jpg", "d"),
        ])
        .await;

    let snapshot = controller.tracker().snapshot().await;
    assert_eq!(ids.len(), 4);
    assert_eq!(snapshot.len(), 4);
    assert!(snapshot.iter().all(|v| v.status == ItemStatus::Processing));

    gate.add_permits(4);
    settle(controller.tracker()).await;

    let snapshot = controller.tracker().snapshot().await;
    assert!(snapshot.iter().all(|v| v.status == ItemStatus::Done));
}

// ---------------------------------------------------------------------------
// Test: single success carries the service payload
// ---------------------------------------------------------------------------

#[tokio::test]
async fn single_success_stores_result() {
    let controller = BatchController::new(ScriptedEditor::open());

    let ids = controller.submit(vec![input("part.jpeg", "ok")]).await;
    settle(controller.tracker()).await;

    let view = controller.tracker().get(ids[0]).await.unwrap();
    assert_eq!(view.status, ItemStatus::Done);
    assert_eq!(view.result, Some(expected_result("ok")));
    assert!(view.error.is_none());
    assert!(view.elapsed().is_some());
}

// ---------------------------------------------------------------------------
// Test: zero image parts becomes an error
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_image_becomes_error() {
    let controller = BatchController::new(ScriptedEditor::open());

    let ids = controller.submit(vec![input("part.png", "empty")]).await;
    settle(controller.tracker()).await;

    let view = controller.tracker().get(ids[0]).await.unwrap();
    assert_eq!(view.status, ItemStatus::Error);
    assert!(view.result.is_none());
    assert!(view.error.unwrap().contains("did not return an image"));
}

// ---------------------------------------------------------------------------
// Test: second of three fails, the others complete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn middle_failure_leaves_siblings_done() {
    let controller = BatchController::new(ScriptedEditor::open());

    let ids = controller
        .submit(vec![
            input("one.jpg", "one"),
            input("two.jpg", "fail:connection reset by peer"),
            input("three.jpg", "three"),
        ])
        .await;
    assert_eq!(controller.tracker().len().await, 3);

    settle(controller.tracker()).await;
    assert_eq!(controller.tracker().len().await, 3);

    let tracker = controller.tracker();
    let one = tracker.get(ids[0]).await.unwrap();
    let two = tracker.get(ids[1]).await.unwrap();
    let three = tracker.get(ids[2]).await.unwrap();

    assert_eq!(one.status, ItemStatus::Done);
    assert_eq!(one.result, Some(expected_result("one")));
    assert_eq!(three.status, ItemStatus::Done);
    assert_eq!(three.result, Some(expected_result("three")));

    assert_eq!(two.status, ItemStatus::Error);
    assert_eq!(
        two.error.as_deref(),
        Some("Failed to edit image: connection reset by peer")
    );
}

// ---------------------------------------------------------------------------
// Test: one failure among many does not affect the rest
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failures_are_isolated() {
    let controller = BatchController::new(ScriptedEditor::open());

    let mut inputs: Vec<RawInput> = (0..6).map(|i| input(&format!("{i}.png"), &format!("ok-{i}"))).collect();
    inputs.insert(3, input("bad.png", "fail:quota exceeded"));
    let ids = controller.submit(inputs).await;

    settle(controller.tracker()).await;

    let counts = controller.tracker().counts().await;
    assert_eq!(counts.done, 6);
    assert_eq!(counts.error, 1);
    assert_eq!(
        controller.tracker().get(ids[3]).await.unwrap().status,
        ItemStatus::Error
    );
}

// ---------------------------------------------------------------------------
// Test: unreadable source is a read error for that item only
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unreadable_file_becomes_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing: PathBuf = dir.path().join("vanished.png");
    let controller = BatchController::new(ScriptedEditor::open());

    let ids = controller
        .submit(vec![
            RawInput::from_path(&missing).unwrap(),
            input("fine.png", "fine"),
        ])
        .await;
    settle(controller.tracker()).await;

    let failed = controller.tracker().get(ids[0]).await.unwrap();
    assert_eq!(failed.status, ItemStatus::Error);
    assert!(failed.error.unwrap().starts_with("Failed to read"));
    assert_eq!(
        controller.tracker().get(ids[1]).await.unwrap().status,
        ItemStatus::Done
    );
}

// ---------------------------------------------------------------------------
// Test: a panicking task is reported as an unknown error
// ---------------------------------------------------------------------------

#[tokio::test]
async fn panic_becomes_unknown_error() {
    let controller = BatchController::new(ScriptedEditor::open());

    let ids = controller
        .submit(vec![input("p.png", "panic"), input("q.png", "q")])
        .await;
    settle(controller.tracker()).await;

    let panicked = controller.tracker().get(ids[0]).await.unwrap();
    assert_eq!(panicked.status, ItemStatus::Error);
    assert_eq!(panicked.error.as_deref(), Some(UNKNOWN_ERROR_MESSAGE));
    assert_eq!(
        controller.tracker().get(ids[1]).await.unwrap().status,
        ItemStatus::Done
    );
}

// ---------------------------------------------------------------------------
// Test: a hung item stays processing without holding up siblings
// ---------------------------------------------------------------------------

#[tokio::test]
async fn hung_item_does_not_block_siblings() {
    let editor = ScriptedEditor::open();
    let controller = BatchController::new(editor.clone());

    let ids = controller
        .submit(vec![
            input("slow.png", "hang"),
            input("a.png", "a"),
            input("b.png", "b"),
        ])
        .await;

    tokio::time::timeout(SETTLE_TIMEOUT, async {
        while controller.tracker().counts().await.done < 2 {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("siblings did not finish");

    assert_eq!(
        controller.tracker().get(ids[0]).await.unwrap().status,
        ItemStatus::Processing
    );
    assert!(!controller.tracker().is_settled().await);
}

// ---------------------------------------------------------------------------
// Test: reset on an empty tracker is a no-op
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reset_on_empty_is_noop() {
    let controller = BatchController::new(ScriptedEditor::open());

    controller.reset().await;
    controller.reset().await;

    assert!(controller.tracker().is_empty().await);
    assert_eq!(controller.previews().released(), 0);
}

// ---------------------------------------------------------------------------
// Test: reset releases previews; late completions are ignored
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reset_while_in_flight_ignores_late_results() {
    let gate = Arc::new(Semaphore::new(0));
    let editor = ScriptedEditor::gated(Arc::clone(&gate));
    let controller = BatchController::new(editor.clone());

    controller
        .submit(vec![input("a.png", "a"), input("b.png", "b")])
        .await;
    assert_eq!(controller.previews().live(), 2);

    controller.reset().await;
    assert!(controller.tracker().is_empty().await);
    assert_eq!(controller.previews().live(), 0);
    assert_eq!(controller.previews().released(), 2);

    gate.add_permits(2);
    tokio::time::timeout(SETTLE_TIMEOUT, async {
        while editor.finished.load(Ordering::SeqCst) < 2 {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("edits did not finish");
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert!(controller.tracker().is_empty().await);
    assert_eq!(controller.previews().released(), 2);
}

// ---------------------------------------------------------------------------
// Test: a new batch supersedes the previous one
// ---------------------------------------------------------------------------

#[tokio::test]
async fn new_batch_replaces_previous() {
    let gate = Arc::new(Semaphore::new(0));
    let controller = BatchController::new(ScriptedEditor::gated(Arc::clone(&gate)));

    let first = controller
        .submit(vec![input("a.png", "a"), input("b.png", "b")])
        .await;
    let second = controller.submit(vec![input("c.png", "c")]).await;

    assert_eq!(controller.tracker().len().await, 1);
    assert_eq!(controller.previews().released(), 2);
    assert_eq!(controller.previews().live(), 1);

    gate.add_permits(3);
    settle(controller.tracker()).await;

    for id in &first {
        assert!(controller.tracker().get(*id).await.is_none());
    }
    let c = controller.tracker().get(second[0]).await.unwrap();
    assert_eq!(c.status, ItemStatus::Done);
    assert_eq!(c.result, Some(expected_result("c")));
}

// ---------------------------------------------------------------------------
// Test: identical file names still get distinct identities
// ---------------------------------------------------------------------------

#[tokio::test]
async fn duplicate_names_get_distinct_ids() {
    let controller = BatchController::new(ScriptedEditor::open());

    let ids = controller
        .submit(vec![input("same.png", "x"), input("same.png", "y")])
        .await;

    assert_ne!(ids[0], ids[1]);
    settle(controller.tracker()).await;

    let snapshot = controller.tracker().snapshot().await;
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot[0].result, Some(expected_result("x")));
    assert_eq!(snapshot[1].result, Some(expected_result("y")));
}

// ---------------------------------------------------------------------------
// Test: concurrent transitions on worker threads lose no update
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_transitions_are_all_applied() {
    const ITEMS: usize = 500;

    let tracker = Arc::new(ItemTracker::new());
    let previews = PreviewRegistry::new();
    let items: Vec<TrackedItem> = (0..ITEMS)
        .map(|i| TrackedItem::new(input(&format!("{i}.jpg"), "x"), &previews))
        .collect();
    let ids: Vec<_> = items.iter().map(|item| item.id).collect();
    tracker.create_batch(items).await;

    let mut handles = Vec::with_capacity(ITEMS * 2);
    for (i, id) in ids.iter().copied().enumerate() {
        let first = Arc::clone(&tracker);
        handles.push(tokio::spawn(async move {
            if i % 3 == 0 {
                first.mark_error(id, format!("failed {i}")).await
            } else {
                first.mark_done(id, expected_result(&i.to_string())).await
            }
        }));
        // A competing second transition for the same item.
        let second = Arc::clone(&tracker);
        handles.push(tokio::spawn(async move {
            second.mark_error(id, "late duplicate").await
        }));
    }

    let mut applied = 0;
    for handle in handles {
        if handle.await.unwrap() {
            applied += 1;
        }
    }

    // Exactly one transition per item wins.
    assert_eq!(applied, ITEMS);
    let counts = tracker.counts().await;
    assert_eq!(counts.processing, 0);
    assert_eq!(counts.total(), ITEMS);

    for view in tracker.snapshot().await {
        assert!(view.finished_at.is_some());
        match view.status {
            ItemStatus::Done => assert!(view.result.is_some() && view.error.is_none()),
            ItemStatus::Error => assert!(view.result.is_none() && view.error.is_some()),
            ItemStatus::Processing => unreachable!(),
        }
    }
}

// ---------------------------------------------------------------------------
// Test: a large mixed batch on worker threads settles with exact counts
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn large_mixed_batch_on_worker_threads() {
    const ITEMS: usize = 300;

    let controller = BatchController::new(ScriptedEditor::open());
    let inputs: Vec<RawInput> = (0..ITEMS)
        .map(|i| {
            let script = if i % 3 == 0 { format!("fail:net {i}") } else { format!("ok {i}") };
            input(&format!("{i}.jpg"), &script)
        })
        .collect();

    let ids = controller.submit(inputs).await;
    settle(controller.tracker()).await;

    let counts = controller.tracker().counts().await;
    assert_eq!(counts.processing, 0);
    assert_eq!(counts.error, ITEMS / 3);
    assert_eq!(counts.done, ITEMS - ITEMS / 3);

    for (i, id) in ids.into_iter().enumerate() {
        let view = controller.tracker().get(id).await.unwrap();
        if i % 3 == 0 {
            assert_eq!(view.error.as_deref(), Some(format!("Failed to edit image: net {i}").as_str()));
        } else {
            assert_eq!(view.result, Some(expected_result(&format!("ok {i}"))));
        }
    }
}
