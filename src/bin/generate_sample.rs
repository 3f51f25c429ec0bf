use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// (country, source, typical m³/hour, typical hours/day)
const SITES: [(&str, &str, f64, f64); 6] = [
    ("Kenya", "Borehole", 12.0, 14.0),
    ("Kenya", "Spring", 6.0, 20.0),
    ("Uganda", "Borehole", 10.0, 12.0),
    ("Uganda", "Surface Water", 25.0, 9.0),
    ("Tanzania", "Spring", 7.5, 18.0),
    ("Tanzania", "Rainwater", 3.0, 6.0),
];

const DAYS: i64 = 365;

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).context("invalid start date")?;

    let output_path = Path::new("data/production_basic_aggregated.csv");
    if let Some(dir) = output_path.parent() {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {}", output_path.display()))?;

    writer.write_record([
        "date",
        "country",
        "source",
        "production_m3",
        "service_hours",
        "production_m3_per_hour",
    ])?;

    let mut rows = 0usize;
    for day in 0..DAYS {
        let date = start + Duration::days(day);
        // dry season dip around mid-year
        let season = 1.0 - 0.25 * (2.0 * std::f64::consts::PI * day as f64 / DAYS as f64).sin();

        for &(country, source, rate, hours) in &SITES {
            let hours = rng.gauss(hours, 1.5).clamp(0.0, 24.0);
            let rate = (rng.gauss(rate, rate * 0.1) * season).max(0.0);
            let production = rate * hours;
            let efficiency = if hours > 0.0 { production / hours } else { 0.0 };

            writer.write_record([
                date.format("%Y-%m-%d").to_string(),
                country.to_string(),
                source.to_string(),
                format!("{production:.2}"),
                format!("{hours:.2}"),
                format!("{efficiency:.2}"),
            ])?;
            rows += 1;
        }
    }

    // A couple of malformed dates the dashboard should drop.
    writer.write_record(["2023-13-40", "Kenya", "Borehole", "100", "10", "10"])?;
    writer.write_record(["31/12/2023", "Uganda", "Borehole", "100", "10", "10"])?;

    writer.flush().context("flushing CSV")?;

    println!(
        "Wrote {rows} rows ({} sites × {DAYS} days) plus 2 malformed rows to {}",
        SITES.len(),
        output_path.display()
    );
    Ok(())
}
