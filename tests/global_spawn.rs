use pledge::{Error, Promise, Runtime, Task, in_runtime, wrap_async, yield_now};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[test]
fn test_global_spawn_basic() {
    let mut rt = Runtime::new();
    let completed = Arc::new(Mutex::new(false));
    let completed_clone = completed.clone();

    rt.block_on(async move {
        Task::spawn(async move {
            *completed_clone.lock().unwrap() = true;
        });
    });

    assert!(
        *completed.lock().unwrap(),
        "Spawned task should have completed"
    );
}

#[test]
fn test_global_spawn_nested() {
    let mut rt = Runtime::new();
    let values = Arc::new(Mutex::new(Vec::new()));

    let v0 = values.clone();
    let v1 = values.clone();
    let v2 = values.clone();

    rt.block_on(async move {
        v0.lock().unwrap().push(1);

        Task::spawn(async move {
            v1.lock().unwrap().push(2);

            Task::spawn(async move {
                v2.lock().unwrap().push(3);
            });
        });
    });

    let mut vals = values.lock().unwrap().clone();
    vals.sort();
    assert_eq!(vals, vec![1, 2, 3], "All nested spawns should execute");
}

#[test]
fn test_join_handle_returns_output() {
    let mut rt = Runtime::new();

    let result = rt.block_on(async {
        let first = Task::spawn(async { 5 * 5 });
        let second = Task::spawn(async { 10 * 10 });
        first.await + second.await
    });

    assert_eq!(result, 125, "Join handles should yield task outputs");
}

#[test]
#[should_panic(expected = "Task::spawn() called outside of a runtime context")]
fn test_global_spawn_panics_outside_runtime() {
    Task::spawn(async {});
}

#[test]
fn test_try_spawn_outside_runtime_returns_none() {
    assert!(!in_runtime());
    assert!(Task::try_spawn(async {}).is_none());
}

#[test]
fn test_in_runtime_inside_block_on() {
    let mut rt = Runtime::new();

    assert!(rt.block_on(async { in_runtime() }));
    assert!(!in_runtime(), "Context should be cleared after block_on");
}

#[test]
fn test_promise_from_future_settles_with_output() {
    let mut rt = Runtime::new();

    let result = rt.block_on(async {
        let ok = Promise::<u32>::from_future(async {
            pledge::sleep(Duration::from_millis(5)).await;
            Ok(3)
        });
        let failed = Promise::<u32>::from_future(async { Err(Error::msg("async failure")) });

        (ok.await, failed.await)
    });

    assert_eq!(result, (Ok(3), Err(Error::msg("async failure"))));
}

#[test]
fn test_wrap_async_spawns_each_call() {
    let mut rt = Runtime::new();

    let result = rt.block_on(async {
        let double = wrap_async(|n: u32| async move {
            pledge::sleep(Duration::from_millis(1)).await;
            if n == 0 {
                Err(Error::InvalidArgument("zero".into()))
            } else {
                Ok(n * 2)
            }
        });

        let values = pledge::all(vec![double(1), double(2), double(3)]).await;
        let rejected = double(0).await;
        (values, rejected)
    });

    assert_eq!(result.0, Ok(vec![2, 4, 6]));
    assert_eq!(result.1, Err(Error::InvalidArgument("zero".into())));
}

#[test]
fn test_spawn_from_separate_async_function() {
    let mut rt = Runtime::new();
    let counter = Arc::new(Mutex::new(0));

    let c = counter.clone();
    rt.block_on(async move {
        do_work_with_spawn(c).await;
    });

    assert_eq!(
        *counter.lock().unwrap(),
        42,
        "Spawn from separate function should work"
    );
}

async fn do_work_with_spawn(counter: Arc<Mutex<i32>>) {
    let c1 = counter.clone();
    let c2 = counter.clone();

    Task::spawn(async move {
        *c1.lock().unwrap() += 10;
    });

    Task::spawn(async move {
        *c2.lock().unwrap() += 32;
    });
}

#[test]
fn test_yield_now_lets_queued_tasks_run_first() {
    let mut rt = Runtime::new();
    let order = Arc::new(Mutex::new(Vec::new()));

    let first = order.clone();
    let second = order.clone();

    rt.block_on(async move {
        Task::spawn(async move {
            first.lock().unwrap().push("a: before yield");
            yield_now().await;
            first.lock().unwrap().push("a: after yield");
        });

        Task::spawn(async move {
            second.lock().unwrap().push("b");
        });
    });

    assert_eq!(
        *order.lock().unwrap(),
        vec!["a: before yield", "b", "a: after yield"],
        "Yielding task should resume after the other ready task"
    );
}

#[test]
fn test_yield_now_in_main_future_completes() {
    let mut rt = Runtime::new();

    let value = rt.block_on(async {
        let mut total = 0;
        for n in 1..=3 {
            yield_now().await;
            total += n;
        }
        total
    });

    assert_eq!(value, 6);
}
