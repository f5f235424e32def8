//! Transfers against real Redis instances.
//!
//! Run with two scratch databases (both are flushed):
//! ```text
//! RUMP_TEST_SOURCE=redis://localhost:6379/14 \
//! RUMP_TEST_TARGET=redis://localhost:6379/15 \
//! cargo test -p rump-redis --test live -- --ignored
//! ```
use std::sync::Arc;

use redis::aio::ConnectionManager;
use rump_core::{Coordinator, PipelineOptions};
use rump_model::{Endpoint, Flag};
use rump_redis::{RedisPool, RedisSource, RedisTarget};

fn endpoint(var: &str) -> Endpoint {
    let url = std::env::var(var).unwrap_or_else(|_| panic!("{var} must be set for live tests"));
    url.parse().expect("valid redis url")
}

async fn flushed(ep: &Endpoint) -> ConnectionManager {
    let client = redis::Client::open(ep.as_str()).unwrap();
    let mut conn = ConnectionManager::new(client).await.unwrap();
    let _: () = redis::cmd("FLUSHDB").query_async(&mut conn).await.unwrap();
    conn
}

async fn coordinator(src: &Endpoint, dst: &Endpoint, opts: PipelineOptions) -> Coordinator {
    let source = RedisSource::new(RedisPool::connect(src, 1).await.unwrap());
    let target = RedisTarget::new(RedisPool::connect(dst, opts.workers).await.unwrap());
    Coordinator::new(Arc::new(source), Arc::new(target), opts).unwrap()
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs RUMP_TEST_SOURCE and RUMP_TEST_TARGET"]
async fn copies_values_and_expirations() {
    let (src, dst) = (endpoint("RUMP_TEST_SOURCE"), endpoint("RUMP_TEST_TARGET"));
    let mut s = flushed(&src).await;
    let mut t = flushed(&dst).await;

    let _: () = redis::cmd("SET").arg("a").arg("1").query_async(&mut s).await.unwrap();
    let _: () = redis::cmd("PSETEX")
        .arg("b")
        .arg(5_000)
        .arg("2")
        .query_async(&mut s)
        .await
        .unwrap();

    let opts = PipelineOptions::default()
        .with_workers(2)
        .with_sync_ttl(Flag::enabled());
    let report = coordinator(&src, &dst, opts).await.run().await.unwrap();
    assert_eq!(report.restored, 2);

    let a: String = redis::cmd("GET").arg("a").query_async(&mut t).await.unwrap();
    let b: String = redis::cmd("GET").arg("b").query_async(&mut t).await.unwrap();
    assert_eq!((a.as_str(), b.as_str()), ("1", "2"));

    let a_ttl: i64 = redis::cmd("PTTL").arg("a").query_async(&mut t).await.unwrap();
    let b_ttl: i64 = redis::cmd("PTTL").arg("b").query_async(&mut t).await.unwrap();
    assert_eq!(a_ttl, -1);
    assert!(b_ttl > 4_000 && b_ttl <= 5_000, "got {b_ttl}");
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "needs RUMP_TEST_SOURCE and RUMP_TEST_TARGET"]
async fn rerun_overwrites_and_ignores_expirations_when_disabled() {
    let (src, dst) = (endpoint("RUMP_TEST_SOURCE"), endpoint("RUMP_TEST_TARGET"));
    let mut s = flushed(&src).await;
    let mut t = flushed(&dst).await;

    for i in 0..500 {
        let _: () = redis::cmd("SET")
            .arg(format!("k{i}"))
            .arg(i)
            .arg("PX")
            .arg(60_000)
            .query_async(&mut s)
            .await
            .unwrap();
    }
    let _: () = redis::cmd("SET").arg("k0").arg("stale").query_async(&mut t).await.unwrap();

    let opts = PipelineOptions::default().with_workers(4);
    let c = coordinator(&src, &dst, opts).await;
    c.run().await.unwrap();
    c.run().await.unwrap();

    let size: u64 = redis::cmd("DBSIZE").query_async(&mut t).await.unwrap();
    assert_eq!(size, 500);
    let k0: String = redis::cmd("GET").arg("k0").query_async(&mut t).await.unwrap();
    assert_eq!(k0, "0");
    let ttl: i64 = redis::cmd("PTTL").arg("k0").query_async(&mut t).await.unwrap();
    assert_eq!(ttl, -1);
}
