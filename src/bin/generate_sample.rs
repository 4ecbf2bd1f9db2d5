use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

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

    /// Pick an index with probability proportional to `weights`.
    fn weighted(&mut self, weights: &[f64]) -> usize {
        let total: f64 = weights.iter().sum();
        let mut target = self.next_f64() * total;
        for (i, w) in weights.iter().enumerate() {
            if target < *w {
                return i;
            }
            target -= w;
        }
        weights.len() - 1
    }
}

#[derive(Debug, Serialize)]
struct Row {
    job_title: &'static str,
    experience_level: &'static str,
    year: i64,
    salary_in_usd: f64,
    remote_ratio: i64,
}

fn main() {
    let mut rng = SimpleRng::new(42);

    // (title, relative frequency, base salary)
    let titles: [(&str, f64, f64); 14] = [
        ("Data Engineer", 18.0, 142_000.0),
        ("Data Scientist", 16.0, 138_000.0),
        ("Data Analyst", 12.0, 108_000.0),
        ("Machine Learning Engineer", 8.0, 155_000.0),
        ("Analytics Engineer", 4.0, 152_000.0),
        ("Data Architect", 3.0, 161_000.0),
        ("Research Scientist", 2.5, 162_000.0),
        ("Applied Scientist", 2.0, 190_000.0),
        ("Data Science Manager", 1.5, 191_000.0),
        ("Research Engineer", 1.5, 163_000.0),
        ("ML Engineer", 1.0, 157_000.0),
        ("Data Manager", 0.8, 116_000.0),
        ("BI Developer", 0.5, 92_000.0),
        ("Computer Vision Engineer", 0.4, 128_000.0),
    ];
    let title_weights: Vec<f64> = titles.iter().map(|t| t.1).collect();

    // (level, relative frequency, salary multiplier)
    let levels: [(&str, f64, f64); 4] = [
        ("EN", 1.0, 0.62),
        ("MI", 2.5, 0.82),
        ("SE", 6.5, 1.05),
        ("EX", 0.4, 1.35),
    ];
    let level_weights: Vec<f64> = levels.iter().map(|l| l.1).collect();

    // (year, relative frequency, salary growth)
    let years: [(i64, f64, f64); 4] = [
        (2020, 0.7, 0.86),
        (2021, 1.8, 0.90),
        (2022, 6.5, 0.97),
        (2023, 8.0, 1.0),
    ];
    let year_weights: Vec<f64> = years.iter().map(|y| y.1).collect();

    let remote_ratios: [i64; 3] = [0, 50, 100];
    let remote_weights = [5.0, 0.5, 4.5];

    let rows: Vec<Row> = (0..3000)
        .map(|_| {
            let (job_title, _, base) = titles[rng.weighted(&title_weights)];
            let (experience_level, _, level_mult) = levels[rng.weighted(&level_weights)];
            let (year, _, growth) = years[rng.weighted(&year_weights)];
            let remote_ratio = remote_ratios[rng.weighted(&remote_weights)];
            let salary = rng.gauss(base * level_mult * growth, 0.18 * base).max(15_000.0);
            Row {
                job_title,
                experience_level,
                year,
                salary_in_usd: salary.round(),
                remote_ratio,
            }
        })
        .collect();

    // Write CSV
    let csv_path = "ds_salaries_final.csv";
    let mut writer = csv::Writer::from_path(csv_path).expect("Failed to create CSV file");
    for row in &rows {
        writer.serialize(row).expect("Failed to write CSV row");
    }
    writer.flush().expect("Failed to flush CSV file");

    // Write the same table as Parquet
    let schema = Arc::new(Schema::new(vec![
        Field::new("job_title", DataType::Utf8, false),
        Field::new("experience_level", DataType::Utf8, false),
        Field::new("year", DataType::Int64, false),
        Field::new("salary_in_usd", DataType::Float64, false),
        Field::new("remote_ratio", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.job_title).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.experience_level).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(
                rows.iter().map(|r| r.year).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.salary_in_usd).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(
                rows.iter().map(|r| r.remote_ratio).collect::<Vec<_>>(),
            )),
        ],
    )
    .expect("Failed to create RecordBatch");

    let parquet_path = "ds_salaries_final.parquet";
    let file = std::fs::File::create(parquet_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!(
        "Wrote {} salary records to {csv_path} and {parquet_path}",
        rows.len()
    );
}
