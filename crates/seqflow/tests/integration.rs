//! Integration tests for the seqflow operators.

use seqflow::{empty, iter_ok, SequenceExt, StreamExt};
use std::time::Duration;

#[tokio::test]
async fn test_map_preserves_order_and_count() {
    let seq = iter_ok::<_, String>(["adam", "anna", "jack", "jenny"]).map_ok(str::to_uppercase);
    tokio::pin!(seq);

    let mut names = Vec::new();
    while let Some(name) = seq.next().await {
        names.push(name.expect("no errors in this sequence"));
    }

    assert_eq!(names, vec!["ADAM", "ANNA", "JACK", "JENNY"]);
}

#[tokio::test]
async fn test_map_passes_error_through_untouched() {
    let seq = futures::stream::iter(vec![Ok(1), Ok(2), Err("boom")]).map_ok(|n| n * 10);
    tokio::pin!(seq);

    assert_eq!(seq.next().await, Some(Ok(10)));
    assert_eq!(seq.next().await, Some(Ok(20)));
    assert_eq!(seq.next().await, Some(Err("boom")));
    // Fused: nothing after the terminal signal.
    assert_eq!(seq.next().await, None);
    assert_eq!(seq.next().await, None);
}

#[tokio::test]
async fn test_map_is_lazy() {
    let mut calls = 0;
    {
        let _seq = iter_ok::<_, String>([1, 2, 3]).map_ok(|n| {
            calls += 1;
            n
        });
        // Never polled.
    }
    assert_eq!(calls, 0);
}

#[tokio::test]
async fn test_filter_keeps_matching_subsequence() {
    let seq = iter_ok::<_, String>(["adam", "anna", "jack", "jenny"])
        .filter_ok(|name| name.len() > 4)
        .map_ok(str::to_uppercase);
    tokio::pin!(seq);

    assert_eq!(seq.next().await, Some(Ok("JENNY".to_string())));
    assert_eq!(seq.next().await, None);
}

#[tokio::test]
async fn test_flat_map_yields_every_inner_element() {
    let seq = iter_ok::<_, String>(["A", "B", "C", "D", "E", "F"])
        .flat_map(|name| iter_ok([name.to_string(), "newValue".to_string()]));
    tokio::pin!(seq);

    let mut elements = Vec::new();
    while let Some(element) = seq.next().await {
        elements.push(element.expect("no errors in this sequence"));
    }

    // Interleaving across inner sequences is allowed; only the multiset of
    // elements is guaranteed.
    assert_eq!(elements.len(), 12);
    elements.sort();
    let mut expected: Vec<String> = ["A", "B", "C", "D", "E", "F"]
        .iter()
        .flat_map(|name| [(*name).to_string(), "newValue".to_string()])
        .collect();
    expected.sort();
    assert_eq!(elements, expected);
}

#[tokio::test]
async fn test_flat_map_inner_error_terminates() {
    let seq = iter_ok::<_, &str>([1, 2]).flat_map(|n| {
        if n == 2 {
            futures::stream::iter(vec![Err::<i32, _>("inner failed")])
        } else {
            futures::stream::iter(vec![Ok(n)])
        }
    });
    tokio::pin!(seq);

    let mut saw_error = false;
    while let Some(element) = seq.next().await {
        if element.is_err() {
            saw_error = true;
            break;
        }
    }
    assert!(saw_error);
    assert_eq!(seq.next().await, None);
}

#[tokio::test]
async fn test_flat_map_drains_a_buffer_of_empty_inner_sequences() {
    // More upstream elements than the concurrency bound, every inner
    // sequence empty: the merge must keep admitting and complete.
    let seq = iter_ok::<_, String>(0..seqflow::FLAT_MAP_CONCURRENCY * 2 + 1)
        .flat_map(|_| empty::<u32, String>());
    tokio::pin!(seq);

    assert!(seq.next().await.is_none());
}

#[tokio::test]
async fn test_concat_map_preserves_upstream_order() {
    let seq = iter_ok::<_, String>([1, 2, 3]).concat_map(|n| iter_ok([n, n * 10]));
    tokio::pin!(seq);

    let mut elements = Vec::new();
    while let Some(element) = seq.next().await {
        elements.push(element.expect("no errors in this sequence"));
    }

    assert_eq!(elements, vec![1, 10, 2, 20, 3, 30]);
}

#[tokio::test]
async fn test_chain_error_injects_after_last_element() {
    let seq = iter_ok(["A", "B", "C", "D"]).chain_error("forced failure");
    tokio::pin!(seq);

    for expected in ["A", "B", "C", "D"] {
        assert_eq!(seq.next().await, Some(Ok(expected)));
    }
    assert_eq!(seq.next().await, Some(Err("forced failure")));
    // Exactly one terminal signal, then nothing.
    assert_eq!(seq.next().await, None);
    assert_eq!(seq.next().await, None);
}

#[tokio::test]
async fn test_chain_error_upstream_error_wins() {
    let seq = futures::stream::iter(vec![Ok(1), Err("first")]).chain_error("second");
    tokio::pin!(seq);

    assert_eq!(seq.next().await, Some(Ok(1)));
    assert_eq!(seq.next().await, Some(Err("first")));
    assert_eq!(seq.next().await, None);
}

#[tokio::test]
async fn test_default_if_empty_emits_fallback_once() {
    let seq = empty::<u32, String>().default_if_empty(42);
    tokio::pin!(seq);

    assert_eq!(seq.next().await, Some(Ok(42)));
    assert_eq!(seq.next().await, None);
}

#[tokio::test]
async fn test_default_if_empty_passes_elements_through() {
    let seq = iter_ok::<_, String>([7]).default_if_empty(42);
    tokio::pin!(seq);

    assert_eq!(seq.next().await, Some(Ok(7)));
    assert_eq!(seq.next().await, None);
}

#[tokio::test]
async fn test_default_if_empty_error_suppresses_fallback() {
    let seq = futures::stream::iter(vec![Err::<u32, _>("boom")]).default_if_empty(42);
    tokio::pin!(seq);

    assert_eq!(seq.next().await, Some(Err("boom")));
    assert_eq!(seq.next().await, None);
}

#[tokio::test]
async fn test_err_into_widens_error_type() {
    let seq = futures::stream::iter(vec![Ok(1), Err("short")]).err_into::<String>();
    tokio::pin!(seq);

    assert_eq!(seq.next().await, Some(Ok(1)));
    assert_eq!(seq.next().await, Some(Err("short".to_string())));
    assert_eq!(seq.next().await, None);
}

#[tokio::test(start_paused = true)]
async fn test_interval_counts_from_zero() {
    let start = tokio::time::Instant::now();
    let mut ticks = seqflow::interval(Duration::from_secs(1));

    // First element arrives after one full period, not immediately.
    assert_eq!(ticks.next().await, Some(0));
    assert!(start.elapsed() >= Duration::from_secs(1));

    assert_eq!(ticks.next().await, Some(1));
    assert_eq!(ticks.next().await, Some(2));
    assert!(start.elapsed() >= Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn test_interval_delays_after_slow_consumer() {
    let mut ticks = seqflow::interval(Duration::from_secs(1));

    assert_eq!(ticks.next().await, Some(0));

    // Consumer stalls for several periods; ticks are delayed, not burst.
    tokio::time::sleep(Duration::from_secs(5)).await;
    let resumed = tokio::time::Instant::now();
    assert_eq!(ticks.next().await, Some(1));
    let second = ticks.next().await;
    assert_eq!(second, Some(2));
    assert!(resumed.elapsed() >= Duration::from_secs(1));
}

#[tokio::test]
async fn test_composed_pipeline() {
    // filter + map + concat_map in one chain, the way the service composes.
    let seq = iter_ok::<_, String>(1..=6)
        .filter_ok(|n| n % 2 == 0)
        .concat_map(|n| iter_ok([n]))
        .map_ok(|n| n * 100);
    tokio::pin!(seq);

    let mut elements = Vec::new();
    while let Some(element) = seq.next().await {
        elements.push(element.expect("no errors in this sequence"));
    }

    assert_eq!(elements, vec![200, 400, 600]);
}
