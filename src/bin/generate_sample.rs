use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const LAUNCH_COUNT: usize = 56;

/// (site, share of launches, base success rate)
const SITES: [(&str, f64, f64); 4] = [
    ("CCAFS LC-40", 0.46, 0.27),
    ("VAFB SLC-4E", 0.18, 0.40),
    ("KSC LC-39A", 0.23, 0.77),
    ("CCAFS SLC-40", 0.13, 0.43),
];

/// (category, payload range in kg, success bonus)
const BOOSTERS: [(&str, f64, f64, f64); 5] = [
    ("v1.0", 0.0, 700.0, -0.3),
    ("v1.1", 400.0, 4600.0, -0.2),
    ("FT", 1900.0, 9600.0, 0.35),
    ("B4", 2100.0, 9600.0, 0.2),
    ("B5", 3600.0, 9600.0, 0.5),
];

struct Launch {
    flight_number: i64,
    site: &'static str,
    class: i64,
    payload_kg: f64,
    booster_version: String,
    category: &'static str,
}

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

    /// Pick an index according to `weights` (which sum to ~1).
    fn weighted(&mut self, weights: impl Iterator<Item = f64>) -> usize {
        let roll = self.next_f64();
        let mut acc = 0.0;
        let mut last = 0;
        for (i, w) in weights.enumerate() {
            acc += w;
            last = i;
            if roll < acc {
                return i;
            }
        }
        last
    }
}

fn generate(rng: &mut SimpleRng) -> Vec<Launch> {
    (0..LAUNCH_COUNT)
        .map(|i| {
            let (site, _, base_rate) = SITES[rng.weighted(SITES.iter().map(|s| s.1))];

            // Later flights fly newer boosters.
            let era = i * BOOSTERS.len() / LAUNCH_COUNT;
            let (category, lo, hi, bonus) = BOOSTERS[era];

            let payload_kg = (lo + rng.next_f64() * (hi - lo)).round();
            let success_rate = (base_rate + bonus).clamp(0.05, 0.95);
            let class = i64::from(rng.next_f64() < success_rate);

            Launch {
                flight_number: i as i64 + 1,
                site,
                class,
                payload_kg,
                booster_version: format!("F9 {category} B{:04}", 1000 + i),
                category,
            }
        })
        .collect()
}

fn write_csv(path: &str, launches: &[Launch]) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "Flight Number",
        "Launch Site",
        "class",
        "Payload Mass (kg)",
        "Booster Version",
        "Booster Version Category",
    ])?;
    for l in launches {
        writer.write_record([
            l.flight_number.to_string(),
            l.site.to_string(),
            l.class.to_string(),
            format!("{:.1}", l.payload_kg),
            l.booster_version.clone(),
            l.category.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &str, launches: &[Launch]) -> Result<(), Box<dyn std::error::Error>> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Flight Number", DataType::Int64, false),
        Field::new("Launch Site", DataType::Utf8, false),
        Field::new("class", DataType::Int64, false),
        Field::new("Payload Mass (kg)", DataType::Float64, false),
        Field::new("Booster Version", DataType::Utf8, false),
        Field::new("Booster Version Category", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(launches.iter().map(|l| l.flight_number))),
            Arc::new(StringArray::from_iter_values(launches.iter().map(|l| l.site))),
            Arc::new(Int64Array::from_iter_values(launches.iter().map(|l| l.class))),
            Arc::new(Float64Array::from_iter_values(launches.iter().map(|l| l.payload_kg))),
            Arc::new(StringArray::from_iter_values(
                launches.iter().map(|l| l.booster_version.as_str()),
            )),
            Arc::new(StringArray::from_iter_values(launches.iter().map(|l| l.category))),
        ],
    )?;

    let file = std::fs::File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let launches = generate(&mut rng);

    write_csv("spacex_launch_dash.csv", &launches).expect("Failed to write CSV");
    write_parquet("spacex_launch_dash.parquet", &launches).expect("Failed to write Parquet");

    let successes = launches.iter().filter(|l| l.class == 1).count();
    println!(
        "Wrote {} launches ({successes} successful) to spacex_launch_dash.csv / .parquet",
        launches.len()
    );
}
