use pledge::{Error, Promise, retry};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn test_long_pending_then_chain_settles() {
    let (root, resolver) = Promise::<u32>::pending();

    let mut tail = root.clone();
    for _ in 0..100_000 {
        tail = tail.then(|v| Ok(v + 1));
    }

    assert!(tail.is_pending(), "Nothing settles before the root");
    resolver.resolve(0);

    assert_eq!(
        tail.peek(),
        Some(Ok(100_000)),
        "The whole chain should settle before resolve() returns"
    );
}

#[test]
fn test_long_pending_rejection_chain_passes_through() {
    let (root, resolver) = Promise::<u32>::pending();

    let mut tail = root.clone();
    for _ in 0..100_000 {
        tail = tail.map(|v| v + 1);
    }
    let recovered = tail.catch(|_| Ok(7));

    resolver.reject(Error::msg("root failed"));

    assert_eq!(tail.wait(), Err(Error::msg("root failed")));
    assert_eq!(recovered.wait(), Ok(7));
}

#[test]
fn test_long_and_then_chain_settles() {
    let (root, resolver) = Promise::<u32>::pending();

    let mut tail = root.clone();
    for _ in 0..50_000 {
        tail = tail.and_then(|v| Promise::resolved(v + 1));
    }

    resolver.resolve(1);
    assert_eq!(tail.wait(), Ok(50_001));
}

#[test]
fn test_retry_large_budget_with_synchronous_rejections() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counted = calls.clone();

    let result = retry(
        move || {
            counted.fetch_add(1, Ordering::SeqCst);
            Promise::<u32>::rejected(Error::msg("no"))
        },
        100_000,
    );

    assert_eq!(result.peek(), Some(Err(Error::msg("no"))));
    assert_eq!(calls.load(Ordering::SeqCst), 100_001, "Every attempt in the budget runs");
}

#[test]
fn test_retry_large_budget_eventually_succeeds() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counted = calls.clone();

    let result = retry(
        move || {
            let call = counted.fetch_add(1, Ordering::SeqCst) + 1;
            if call < 20_000 {
                Promise::rejected(Error::msg("not yet"))
            } else {
                Promise::resolved(call)
            }
        },
        50_000,
    );

    assert_eq!(result.wait(), Ok(20_000));
    assert_eq!(calls.load(Ordering::SeqCst), 20_000);
}
