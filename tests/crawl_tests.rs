use anyhow::Result;

use leadharvest::config::ApiKey;
use leadharvest::crawl::{CrawlDispatcher, run_crawl};
use leadharvest::errors::LeadError;

mod test_helpers;
use test_helpers::*;

fn key() -> ApiKey {
    ApiKey::new("test-key").unwrap()
}

#[tokio::test]
async fn test_batch_partitioning() -> Result<()> {
    for (n, k) in [(0, 20), (1, 20), (20, 20), (21, 20), (45, 20), (7, 3), (99, 99), (100, 99)] {
        let service = FakeCrawl::new();
        let input = urls(n);
        let records = run_crawl(&service, &key(), input.clone(), k).await?;

        let sizes = service.batch_sizes();
        assert_eq!(sizes.len(), n.div_ceil(k), "n={n} k={k}");
        assert!(sizes.iter().all(|&s| s <= k && s > 0), "n={n} k={k}");

        let crawled: Vec<String> = records.into_iter().filter_map(|r| r.url).collect();
        assert_eq!(crawled, input, "order must be preserved for n={n} k={k}");
    }
    Ok(())
}

#[tokio::test]
async fn test_batches_carry_key_and_function() -> Result<()> {
    let service = FakeCrawl::new();
    run_crawl(&service, &key(), urls(3), 2).await?;

    let requests = service.requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    for request in requests.iter() {
        assert_eq!(request.api_key, "test-key");
        assert_eq!(request.function, "social.js");
        assert_eq!(request.region, "us");
    }
    assert_eq!(requests[0].items, urls(2));
    Ok(())
}

#[tokio::test]
async fn test_item_errors_are_kept() -> Result<()> {
    let input = urls(4);
    let service = FakeCrawl::new().with_errors_for(&[input[1].as_str(), input[3].as_str()]);
    let records = run_crawl(&service, &key(), input, 20).await?;

    assert_eq!(records.len(), 4);
    assert_eq!(records.iter().filter(|r| r.is_error()).count(), 2);
    Ok(())
}

#[tokio::test]
async fn test_failed_batch_is_fatal() -> Result<()> {
    let service = FakeCrawl::new().failing_batch(1);
    let err = run_crawl(&service, &key(), urls(50), 20)
        .await
        .unwrap_err();

    assert!(matches!(err, LeadError::Upstream { service: "crawl", .. }));
    // no retry and nothing after the failed batch
    assert_eq!(service.batch_sizes(), vec![20, 20]);
    Ok(())
}

#[tokio::test]
async fn test_zero_batch_size_is_config_error() -> Result<()> {
    let service = FakeCrawl::new();
    let err = run_crawl(&service, &key(), urls(3), 0).await.unwrap_err();
    assert!(matches!(err, LeadError::Config(_)));
    assert_eq!(service.batch_sizes().len(), 0);
    Ok(())
}

#[tokio::test]
async fn test_concurrent_batches_keep_order() -> Result<()> {
    let service = FakeCrawl::new();
    let input = urls(37);
    let key = key();
    let records = CrawlDispatcher::new(&service, &key, 5)
        .with_concurrency(4)
        .run(input.clone())
        .await?;

    assert_eq!(service.batch_sizes().len(), 8);
    let crawled: Vec<String> = records.into_iter().filter_map(|r| r.url).collect();
    assert_eq!(crawled, input);
    Ok(())
}
