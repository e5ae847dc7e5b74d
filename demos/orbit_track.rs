use geo::{Distance, Haversine};
use serde_json::json;
use spatio_dynamic::{Instant, PositionResolver, SampleContext};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("=== Spatio Dynamic - Position Track ===\n");

    let mut resolver = PositionResolver::builder().log_rejections(true).build()?;
    resolver.set_rejection_hook(|rejected| {
        println!("   ! skipped sample: {} ({})", rejected.reason, rejected.detail);
    });

    // === 1. INGEST MIXED ENCODINGS ===
    println!("1. Ingest Mixed Encodings");
    println!("-------------------------");

    let summary = resolver.process_packet(
        &json!([
            {
                "interval": "2012-03-15T10:00:00Z/2012-03-15T10:10:00Z",
                "epoch": "2012-03-15T10:00:00Z",
                "cartographicDegrees": [
                    0,   -74.0060, 40.7128, 0.0,
                    300, -73.9000, 40.7800, 3000.0,
                    600, -73.7781, 40.6413, 9000.0
                ]
            },
            {
                "interval": "2012-03-15T10:10:00Z/2012-03-15T10:20:00Z",
                "epoch": "2012-03-15T10:10:00Z",
                "cartesian": [
                    0,   1_333_000.0, -4_655_000.0, 4_138_000.0,
                    600, 1_400_000.0, -4_600_000.0, 4_200_000.0
                ]
            },
            { "interval": "2012-03-15T10:20:00Z/2012-03-15T10:30:00Z", "heading": [90.0] }
        ]),
        SampleContext::default(),
    );
    println!(
        "   accepted {} / rejected {} samples into {} spans and {} stores\n",
        summary.accepted,
        summary.rejected,
        resolver.index().len(),
        resolver.stores().len()
    );

    // === 2. QUERY EVERY MINUTE ===
    println!("2. Query Every Minute");
    println!("---------------------");

    let start: Instant = "2012-03-15T10:00:00Z".parse()?;
    let mut previous = None;
    let mut travelled = 0.0;
    for minute in 0..=25 {
        let when = start.add_seconds(minute as f64 * 60.0);
        match resolver.cartographic_at(when) {
            Some(position) => {
                if let Some(prev) = previous {
                    travelled += Haversine.distance(prev, position.to_2d());
                }
                previous = Some(position.to_2d());
                println!(
                    "   {}  ({:.4}°, {:.4}°) at {:.0} m",
                    when,
                    position.longitude(),
                    position.latitude(),
                    position.height()
                );
            }
            None => println!("   {}  no position", when),
        }
    }
    println!("\n   ground track length: {:.1} km\n", travelled / 1000.0);

    // === 3. MEMO STATISTICS ===
    println!("3. Memo Statistics");
    println!("------------------");
    let when = start.add_seconds(90.0);
    resolver.cartesian_at(when);
    resolver.cartesian_at(when);
    resolver.cartographic_at(when);
    let stats = resolver.stats();
    println!("   index searches: {}", stats.index_searches);
    println!("   cache hits:     {}", stats.cache_hits);

    Ok(())
}
