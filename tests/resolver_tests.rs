use serde_json::{Value, json};
use spatio_dynamic::{
    Cartesian3, Ellipsoid, Instant, PositionResolver, RawSample, SampleContext, ValueKind,
};

const START: &str = "2012-03-15T10:00:00Z";

fn t(seconds: f64) -> Instant {
    START.parse::<Instant>().unwrap().add_seconds(seconds)
}

fn interval(from: f64, to: f64) -> String {
    format!("{}/{}", t(from), t(to))
}

fn ingest(resolver: &mut PositionResolver, packet: Value) {
    resolver.process_packet(&packet, SampleContext::default());
}

fn assert_close(a: Cartesian3, b: Cartesian3) {
    assert!(a.distance(&b) < 1e-3, "{:?} != {:?}", a, b);
}

/// Ingesting the same interval and sample twice answers like ingesting once
#[test]
fn test_idempotent_reingestion() {
    let packet = json!({
        "interval": interval(0.0, 100.0),
        "epoch": START,
        "cartesian": [0, 6_378_137.0, 0.0, 0.0, 100, 6_378_237.0, 200.0, 300.0]
    });

    let mut once = PositionResolver::new();
    ingest(&mut once, packet.clone());

    let mut twice = PositionResolver::new();
    ingest(&mut twice, packet.clone());
    ingest(&mut twice, packet);

    for s in [0.0, 12.5, 50.0, 99.0, 100.0] {
        assert_eq!(once.cartesian_at(t(s)), twice.cartesian_at(t(s)));
        assert_eq!(once.cartographic_at(t(s)), twice.cartographic_at(t(s)));
    }
    assert_eq!(twice.index().len(), 1);
    assert_eq!(twice.stores().len(), 1);
}

/// Repeated queries return identical values without searching the index again
#[test]
fn test_cache_transparency() {
    let mut resolver = PositionResolver::new();
    ingest(
        &mut resolver,
        json!([
            { "interval": interval(0.0, 10.0), "cartesian": [1.0, 2.0, 3.0] },
            { "interval": interval(10.0, 20.0), "cartographicDegrees": [45.0, 45.0, 0.0] }
        ]),
    );

    for s in [5.0, 15.0] {
        let first = resolver.cartesian_at(t(s));
        let searches = resolver.stats().index_searches;
        let hits = resolver.stats().cache_hits;

        let second = resolver.cartesian_at(t(s));
        assert_eq!(first, second);
        assert_eq!(resolver.stats().index_searches, searches);
        assert_eq!(resolver.stats().cache_hits, hits + 1);

        let carto_first = resolver.cartographic_at(t(s));
        let carto_second = resolver.cartographic_at(t(s));
        assert_eq!(carto_first, carto_second);
        assert_eq!(resolver.stats().index_searches, searches);
    }
}

/// Disjoint spans of different kinds each answer through their own store
#[test]
fn test_partition_correctness() {
    let mut resolver = PositionResolver::new();
    ingest(
        &mut resolver,
        json!([
            { "interval": interval(0.0, 10.0), "cartesian": [7_000_000.0, 0.0, 0.0] },
            { "interval": interval(10.0, 20.0), "cartographicDegrees": [90.0, 0.0, 1000.0] }
        ]),
    );

    let first = resolver.index().find_containing(t(5.0)).unwrap();
    let second = resolver.index().find_containing(t(15.0)).unwrap();
    let first_kind = resolver.stores().get(first.payload.unwrap()).unwrap().kind();
    let second_kind = resolver.stores().get(second.payload.unwrap()).unwrap().kind();
    assert_eq!(first_kind, ValueKind::Cartesian3);
    assert_eq!(second_kind, ValueKind::Cartographic3);

    assert_eq!(
        resolver.cartesian_at(t(5.0)),
        Some(Cartesian3::new(7_000_000.0, 0.0, 0.0))
    );
    let carto = resolver.cartographic_at(t(15.0)).unwrap();
    assert_eq!(carto.longitude(), 90.0);
    assert_eq!(carto.height(), 1000.0);
}

/// Bounded data answers nothing before the first or after the last span
#[test]
fn test_outside_range_miss() {
    let mut resolver = PositionResolver::new();
    ingest(
        &mut resolver,
        json!([
            { "interval": interval(0.0, 10.0), "cartesian": [1.0, 2.0, 3.0] },
            { "interval": interval(20.0, 30.0), "cartesian": [4.0, 5.0, 6.0] }
        ]),
    );

    assert_eq!(resolver.cartesian_at(t(-0.5)), None);
    assert_eq!(resolver.cartesian_at(t(30.5)), None);
    assert_eq!(resolver.cartographic_at(t(-3600.0)), None);
    assert_eq!(resolver.cartesian_at(t(15.0)), None);
    assert!(resolver.cartesian_at(t(25.0)).is_some());
}

/// A sample without an interval covers the far past and the far future
#[test]
fn test_unbounded_default_interval() {
    let mut resolver = PositionResolver::new();
    ingest(&mut resolver, json!({ "cartographicDegrees": [-74.0, 40.7, 10.0] }));

    let far_past: Instant = "0001-01-01T00:00:00Z".parse().unwrap();
    let far_future: Instant = "9999-12-31T23:59:59Z".parse().unwrap();
    for probe in [far_past, Instant::EPOCH, far_future, Instant::MIN, Instant::MAX] {
        assert!(resolver.cartographic_at(probe).is_some());
        assert!(resolver.cartesian_at(probe).is_some());
    }
}

/// Both representations come from the same native value
#[test]
fn test_cross_representation_consistency() {
    let mut resolver = PositionResolver::new();
    ingest(
        &mut resolver,
        json!([
            {
                "interval": interval(0.0, 60.0),
                "epoch": START,
                "cartographicDegrees": [0, -74.0, 40.7, 100.0, 60, -73.0, 41.7, 500.0]
            },
            {
                "interval": interval(60.0, 120.0),
                "cartesian": [1_334_000.0, -4_654_000.0, 4_138_000.0]
            }
        ]),
    );

    for s in [0.0, 30.0, 59.0, 90.0] {
        let cartesian = resolver.cartesian_at(t(s)).unwrap();
        let cartographic = resolver.cartographic_at(t(s)).unwrap();
        let from_cartographic = Ellipsoid::WGS84.cartographic_to_cartesian(&cartographic);
        assert_close(cartesian, from_cartographic);
    }
}

/// An unsupported encoding is skipped and leaves earlier answers intact
#[test]
fn test_unrecognized_sample_skip() {
    let mut resolver = PositionResolver::new();
    ingest(
        &mut resolver,
        json!({ "interval": interval(0.0, 10.0), "cartesian": [1.0, 2.0, 3.0] }),
    );
    let before = resolver.cartesian_at(t(5.0));

    let summary = resolver.add_sample(
        &RawSample::new(json!({ "interval": interval(0.0, 10.0), "unitQuaternion": [0, 0, 0, 1] })),
        SampleContext::default(),
    );
    assert_eq!(summary.rejected, 1);
    assert_eq!(resolver.cartesian_at(t(5.0)), before);
    assert_eq!(resolver.stats().samples_rejected, 1);
}

/// Sampled data interpolates between samples inside its span
#[test]
fn test_interpolated_track() {
    let mut resolver = PositionResolver::new();
    ingest(
        &mut resolver,
        json!({
            "interval": interval(0.0, 20.0),
            "epoch": START,
            "cartesian": [0, 0.0, 0.0, 0.0, 10, 10.0, 0.0, 0.0, 20, 10.0, 10.0, 0.0]
        }),
    );

    assert_eq!(resolver.cartesian_at(t(5.0)), Some(Cartesian3::new(5.0, 0.0, 0.0)));
    assert_eq!(resolver.cartesian_at(t(15.0)), Some(Cartesian3::new(10.0, 5.0, 0.0)));
}

/// Batches accumulate into the stores already bound to their spans
#[test]
fn test_series_split_across_packets() {
    let mut resolver = PositionResolver::new();
    let span = interval(0.0, 20.0);
    ingest(
        &mut resolver,
        json!({ "interval": span.clone(), "epoch": START, "cartesian": [0, 0.0, 0.0, 0.0] }),
    );
    ingest(
        &mut resolver,
        json!({ "interval": span, "epoch": START, "cartesian": [20, 20.0, 0.0, 0.0] }),
    );

    assert_eq!(resolver.cartesian_at(t(10.0)), Some(Cartesian3::new(10.0, 0.0, 0.0)));
    assert_eq!(resolver.stats().samples_accepted, 2);
}

/// Context values pass through without affecting results
#[test]
fn test_context_is_opaque() {
    let buffer = bytes::Bytes::from_static(b"\x00\x01\x02");
    let ctx = SampleContext::default()
        .with_buffer(&buffer)
        .with_source_uri("https://example.com/scene.czml");

    let mut resolver = PositionResolver::new();
    let summary = resolver.process_packet(&json!({ "cartesian": [1.0, 2.0, 3.0] }), ctx);
    assert_eq!(summary.accepted, 1);
    assert_eq!(
        resolver.cartesian_at(Instant::EPOCH),
        Some(Cartesian3::new(1.0, 2.0, 3.0))
    );
}
