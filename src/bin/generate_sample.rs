use std::f64::consts::PI;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::Float64Array;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Model g(r) of a molecular liquid: excluded core, first solvation peak,
/// damped oscillation towards 1.
fn model_rdf(r: f64) -> f64 {
    const CORE: f64 = 2.45;
    const CORE_WIDTH: f64 = 0.06;
    const PEAK: f64 = 2.75;
    const PERIOD: f64 = 1.9;
    const DECAY: f64 = 1.1;

    let core = 1.0 / (1.0 + (-(r - CORE) / CORE_WIDTH).exp());
    let shell = 1.6 * (PEAK / r.max(1e-6)) * (-(r - PEAK).abs() / DECAY).exp();
    let oscillation = (2.0 * PI * (r - PEAK) / PERIOD).cos();
    (core * (1.0 + shell * oscillation)).max(0.0)
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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    // 0 → 10 Å, step 0.02
    let r: Vec<f64> = (0..=500).map(|i| i as f64 * 0.02).collect();
    let g: Vec<f64> = r
        .iter()
        .map(|&r| {
            let clean = model_rdf(r);
            // No noise inside the core, where g(r) must stay zero.
            if clean < 1e-3 {
                clean
            } else {
                (clean + rng.gauss(0.0, 0.01)).max(0.0)
            }
        })
        .collect();

    // CSV laid out like the worksheet: header, unit row, data.
    let csv_path = "sample_rdf.csv";
    let mut writer = csv::Writer::from_path(csv_path).context("creating CSV")?;
    writer.write_record(["r", "g(r)"])?;
    writer.write_record(["Angstrom", "-"])?;
    for (rv, gv) in r.iter().zip(&g) {
        writer.write_record([format!("{rv:.4}"), format!("{gv:.6}")])?;
    }
    writer.flush()?;

    let schema = Arc::new(Schema::new(vec![
        Field::new("r", DataType::Float64, false),
        Field::new("g", DataType::Float64, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Float64Array::from(r.clone())),
            Arc::new(Float64Array::from(g)),
        ],
    )
    .context("building record batch")?;

    let parquet_path = "sample_rdf.parquet";
    let file = std::fs::File::create(parquet_path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch)?;
    writer.close()?;

    println!(
        "Wrote {} samples (r = 0 … {} Å) to {csv_path} and {parquet_path}",
        r.len(),
        r.last().copied().unwrap_or_default()
    );
    Ok(())
}
