mod support;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use outfitter_engine::Debouncer;

use support::init_logging;

fn counting_debouncer(delay: Duration) -> (Debouncer, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let debouncer = Debouncer::spawn(delay, {
        let count = count.clone();
        move || {
            let count = count.clone();
            async move {
                count.fetch_add(1, Ordering::SeqCst);
            }
        }
    });
    (debouncer, count)
}

#[tokio::test(start_paused = true)]
async fn burst_of_signals_coalesces_into_one_evaluation() {
    init_logging();
    let (debouncer, count) = counting_debouncer(Duration::from_millis(200));

    for _ in 0..3 {
        debouncer.signal();
        tokio::time::advance(Duration::from_millis(100)).await;
        tokio::task::yield_now().await;
    }
    assert_eq!(count.load(Ordering::SeqCst), 0);

    tokio::time::advance(Duration::from_millis(250)).await;
    tokio::task::yield_now().await;
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn quiet_period_allows_a_second_evaluation() {
    init_logging();
    let (debouncer, count) = counting_debouncer(Duration::from_millis(200));

    debouncer.signal();
    tokio::time::advance(Duration::from_millis(250)).await;
    tokio::task::yield_now().await;
    assert_eq!(count.load(Ordering::SeqCst), 1);

    debouncer.signal();
    tokio::time::advance(Duration::from_millis(250)).await;
    tokio::task::yield_now().await;
    assert_eq!(count.load(Ordering::SeqCst), 2);
}
