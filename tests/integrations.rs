mod common;

use common::init_test_logging;
use pledge::integrations::embed::{DESCRIPTION_LIMIT, TITLE_LIMIT};
use pledge::integrations::{Embed, EmbedLimits, Level, LogRecord, Webhook, WorkQueue, log_message};
use pledge::{Error, Promise, all};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[test]
fn test_log_message_fulfills_with_record() {
    init_test_logging();

    let record = log_message("info", "cache warmed").wait().unwrap();

    assert_eq!(record, LogRecord::new(Level::Info, "cache warmed"));
    assert_eq!(record.to_string(), "[INFO] cache warmed");
    assert_eq!(record.to_json(), r#"{"level":"INFO","message":"cache warmed"}"#);
}

#[test]
fn test_log_level_parsing() {
    assert_eq!("DEBUG".parse::<Level>(), Ok(Level::Debug));
    assert_eq!("Warning".parse::<Level>(), Ok(Level::Warn));
    assert_eq!("warn".parse::<Level>(), Ok(Level::Warn));
    assert_eq!("verbose".parse::<Level>(), Err(Error::InvalidLevel("verbose".into())));
}

#[test]
fn test_log_error_severity_emits_and_rejects() {
    init_test_logging();

    let failed = log_message("error", "disk full").wait();

    assert_eq!(failed, Err(Error::Logged("[ERROR] disk full".into())));
}

#[test]
fn test_log_rejects_invalid_input() {
    assert_eq!(
        log_message("loud", "hello").wait(),
        Err(Error::InvalidLevel("loud".into()))
    );
    assert!(matches!(
        log_message("info", "   ").wait(),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn test_embed_within_limits_validates() {
    let embed = Embed::new()
        .title("t".repeat(TITLE_LIMIT))
        .description("d".repeat(DESCRIPTION_LIMIT))
        .color(0x00ff00);

    assert_eq!(embed.validate(&EmbedLimits::default()).wait(), Ok(()));
}

#[test]
fn test_embed_limits_count_characters() {
    let title = "é".repeat(TITLE_LIMIT);
    assert!(title.len() > TITLE_LIMIT, "Multi-byte title exceeds the limit in bytes");

    let embed = Embed::new().title(title);
    assert_eq!(embed.validate(&EmbedLimits::default()).wait(), Ok(()));
}

#[test]
fn test_embed_over_limit_rejects_with_field() {
    let long_title = Embed::new().title("x".repeat(TITLE_LIMIT + 1));
    let long_description = Embed::new().description("x".repeat(DESCRIPTION_LIMIT + 1));

    assert_eq!(
        long_title.validate(&EmbedLimits::default()).wait(),
        Err(Error::LimitExceeded {
            field: "title",
            limit: TITLE_LIMIT,
            len: TITLE_LIMIT + 1,
        })
    );
    assert!(matches!(
        long_description.validate(&EmbedLimits::default()).wait(),
        Err(Error::LimitExceeded { field: "description", .. })
    ));
}

#[test]
fn test_embed_validations_compose_with_all() {
    let limits = EmbedLimits {
        title: 4,
        ..EmbedLimits::default()
    };
    let embeds = [Embed::new().title("ok"), Embed::new().title("too long")];

    let checked = all(embeds.iter().map(|embed| embed.validate(&limits)));

    assert!(matches!(checked.wait(), Err(Error::LimitExceeded { field: "title", .. })));
}

fn recording_hook() -> (Webhook<impl Fn(String) -> Promise<(), Error> + Send + Sync>, Arc<Mutex<Vec<String>>>) {
    let bodies = Arc::new(Mutex::new(Vec::new()));
    let recorded = bodies.clone();

    let hook = Webhook::new(move |body: String| {
        recorded.lock().unwrap().push(body);
        Promise::<(), Error>::resolved(())
    });

    (hook, bodies)
}

#[test]
fn test_webhook_delivers_serialized_payload() {
    init_test_logging();
    let (hook, bodies) = recording_hook();
    let hook = hook.username("deploy-bot");

    let sent = hook.send(Some("deployed"), vec![Embed::new().title("v1.2.0")]);

    assert_eq!(sent.wait(), Ok(()));
    assert_eq!(
        *bodies.lock().unwrap(),
        vec![r#"{"content":"deployed","username":"deploy-bot","embeds":[{"title":"v1.2.0"}]}"#.to_string()]
    );
}

#[test]
fn test_webhook_requires_content_or_embed() {
    let (hook, bodies) = recording_hook();

    assert!(matches!(
        hook.send(Some("  "), Vec::new()).wait(),
        Err(Error::InvalidArgument(_))
    ));
    assert!(bodies.lock().unwrap().is_empty(), "Nothing should reach the sink");
}

#[test]
fn test_webhook_rejects_too_many_embeds() {
    let (hook, bodies) = recording_hook();
    let embeds = vec![Embed::new().title("e"); 11];

    assert_eq!(
        hook.send(None, embeds).wait(),
        Err(Error::LimitExceeded {
            field: "embeds",
            limit: 10,
            len: 11,
        })
    );
    assert!(bodies.lock().unwrap().is_empty());
}

#[test]
fn test_webhook_invalid_embed_never_reaches_sink() {
    let (hook, bodies) = recording_hook();

    let sent = hook.send(None, vec![Embed::new().title("x".repeat(TITLE_LIMIT + 1))]);

    assert!(matches!(sent.wait(), Err(Error::LimitExceeded { field: "title", .. })));
    assert!(bodies.lock().unwrap().is_empty());
}

#[test]
fn test_webhook_surfaces_sink_failure() {
    let hook = Webhook::new(|_body: String| {
        Promise::<(), Error>::rejected(Error::Delivery("502 bad gateway".into()))
    });

    assert_eq!(
        hook.send(Some("hello"), Vec::new()).wait(),
        Err(Error::Delivery("502 bad gateway".into()))
    );
}

#[test]
fn test_work_queue_runs_jobs_off_thread() {
    init_test_logging();
    let queue = WorkQueue::builder().workers(2).thread_name("test-worker").build().unwrap();

    let name = queue.submit(|| Ok(thread::current().name().map(str::to_string)));
    let sum = queue.submit(|| Ok((1..=10).sum::<u32>()));

    let name = name.wait().unwrap().unwrap_or_default();
    assert!(name.starts_with("test-worker-"), "Job ran on {name}");
    assert_eq!(sum.wait(), Ok(55));
}

#[test]
fn test_work_queue_job_error_and_panic_reject() {
    let queue = WorkQueue::builder().build().unwrap();

    let failed = queue.submit(|| Err::<u8, _>(Error::msg("job failed")));
    let panicked = queue.submit(|| -> Result<u8, Error> { panic!("job exploded") });
    let after = queue.submit(|| Ok(1u8));

    assert_eq!(failed.wait(), Err(Error::msg("job failed")));
    assert_eq!(panicked.wait(), Err(Error::msg("queued job panicked")));
    assert_eq!(after.wait(), Ok(1), "Worker should survive a panicking job");
}

#[test]
fn test_work_queue_rejects_after_shutdown() {
    let queue = WorkQueue::builder().build().unwrap();
    let slow = queue.submit(|| {
        thread::sleep(Duration::from_millis(20));
        Ok("drained")
    });

    queue.shutdown();

    assert!(!queue.is_open());
    assert_eq!(slow.peek(), Some(Ok("drained")), "Queued work finishes before shutdown returns");
    assert_eq!(queue.submit(|| Ok(0u8)).wait(), Err(Error::QueueClosed));
}

#[test]
fn test_work_queue_survives_panicking_reaction() {
    init_test_logging();
    let queue = WorkQueue::builder().build().unwrap();
    let (release, gate) = mpsc::channel::<()>();

    let first = queue.submit(move || {
        let _ = gate.recv();
        Ok(1u8)
    });
    let _ = first.then(|_| -> Result<(), Error> { panic!("reaction exploded") });
    release.send(()).unwrap();

    assert_eq!(first.wait(), Ok(1));
    assert_eq!(
        queue.submit(|| Ok(2u8)).wait(),
        Ok(2),
        "The single worker should still be alive"
    );
    assert!(queue.is_open());
}

#[test]
fn test_work_queue_shutdown_from_worker_reaction() {
    let queue = Arc::new(WorkQueue::builder().build().unwrap());
    let (release, gate) = mpsc::channel::<()>();

    let closer = queue.clone();
    let done = queue
        .submit(move || {
            let _ = gate.recv();
            Ok(thread::current().id())
        })
        .then(move |worker| {
            closer.shutdown();
            Ok(worker == thread::current().id())
        });
    release.send(()).unwrap();

    assert_eq!(done.wait(), Ok(true), "Shutdown ran on the worker and returned");
    assert!(!queue.is_open());
    assert_eq!(queue.submit(|| Ok(0u8)).wait(), Err(Error::QueueClosed));
}
