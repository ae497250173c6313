use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// (ISO-3 code, relative weight, ADR multiplier)
const COUNTRIES: [(&str, u32, f64); 12] = [
    ("PRT", 40, 0.9),
    ("GBR", 12, 1.05),
    ("FRA", 10, 1.1),
    ("ESP", 8, 1.0),
    ("DEU", 7, 1.08),
    ("ITA", 4, 1.12),
    ("IRL", 3, 1.0),
    ("BEL", 2, 1.06),
    ("BRA", 2, 1.15),
    ("NLD", 2, 1.04),
    ("USA", 2, 1.2),
    ("CHE", 1, 1.3),
];

/// (segment, relative weight, ADR multiplier)
const SEGMENTS: [(&str, u32, f64); 6] = [
    ("Online TA", 47, 1.1),
    ("Offline TA/TO", 20, 0.85),
    ("Groups", 17, 0.75),
    ("Direct", 10, 1.15),
    ("Corporate", 5, 0.8),
    ("Complementary", 1, 0.0),
];

const HOTELS: [&str; 2] = ["Resort Hotel", "City Hotel"];

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

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// Pick from `(item, weight, _)` triples proportionally to weight.
    fn weighted<'a>(&mut self, items: &'a [(&'a str, u32, f64)]) -> &'a (&'a str, u32, f64) {
        let total: u32 = items.iter().map(|i| i.1).sum();
        let mut pick = self.below(total as u64) as u32;
        for item in items {
            if pick < item.1 {
                return item;
            }
            pick -= item.1;
        }
        &items[items.len() - 1]
    }
}

#[derive(Default)]
struct Columns {
    hotel: Vec<String>,
    is_canceled: Vec<i64>,
    lead_time: Vec<i64>,
    year: Vec<i64>,
    month: Vec<String>,
    adults: Vec<i64>,
    country: Vec<Option<String>>,
    segment: Vec<String>,
    adr: Vec<f64>,
    special_requests: Vec<i64>,
}

fn generate(rng: &mut SimpleRng) -> Columns {
    let mut cols = Columns::default();

    // July 2015 through August 2017, like the public hotel bookings data.
    let periods = (7..=12)
        .map(|m| (2015, m))
        .chain((1..=12).map(|m| (2016, m)))
        .chain((1..=8).map(|m| (2017, m)));

    for (year, month) in periods {
        // Summer peak, winter trough.
        let season = 1.0 + 0.35 * ((month as f64 - 1.5) / 12.0 * std::f64::consts::TAU).sin().abs();
        let bookings = (60.0 * season + rng.gauss(0.0, 6.0)).round().max(10.0) as usize;

        for _ in 0..bookings {
            let hotel = HOTELS[rng.below(2) as usize];
            let &(country, _, country_mult) = rng.weighted(&COUNTRIES);
            let &(segment, _, segment_mult) = rng.weighted(&SEGMENTS);
            let adults = 1 + rng.below(3) as i64;
            let base = if hotel == "City Hotel" { 105.0 } else { 95.0 };
            let noise = rng.gauss(0.0, 12.0) * segment_mult;
            let adr = (base * season * country_mult * segment_mult + noise).max(0.0);

            cols.hotel.push(hotel.to_string());
            cols.is_canceled.push((rng.next_f64() < 0.37) as i64);
            cols.lead_time.push(rng.gauss(100.0, 80.0).abs().round() as i64);
            cols.year.push(year);
            cols.month.push(MONTHS[month - 1].to_string());
            cols.adults.push(adults);
            // A few bookings carry no country, as in the real data.
            cols.country
                .push((rng.next_f64() > 0.004).then(|| country.to_string()));
            cols.segment.push(segment.to_string());
            cols.adr.push((adr * 100.0).round() / 100.0);
            cols.special_requests.push(rng.below(4).min(rng.below(6)) as i64);
        }
    }
    cols
}

fn write_csv(cols: &Columns, path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record([
        "hotel",
        "is_canceled",
        "lead_time",
        "arrival_date_year",
        "arrival_date_month",
        "adults",
        "country",
        "market_segment",
        "adr",
        "total_of_special_requests",
    ])?;
    for i in 0..cols.year.len() {
        writer.write_record([
            cols.hotel[i].clone(),
            cols.is_canceled[i].to_string(),
            cols.lead_time[i].to_string(),
            cols.year[i].to_string(),
            cols.month[i].clone(),
            cols.adults[i].to_string(),
            cols.country[i].clone().unwrap_or_else(|| "NULL".to_string()),
            cols.segment[i].clone(),
            cols.adr[i].to_string(),
            cols.special_requests[i].to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn strings(v: &[String]) -> StringArray {
    StringArray::from(v.iter().map(|s| s.as_str()).collect::<Vec<_>>())
}

fn write_parquet(cols: &Columns, path: &str) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("hotel", DataType::Utf8, false),
        Field::new("is_canceled", DataType::Int64, false),
        Field::new("lead_time", DataType::Int64, false),
        Field::new("arrival_date_year", DataType::Int64, false),
        Field::new("arrival_date_month", DataType::Utf8, false),
        Field::new("adults", DataType::Int64, false),
        Field::new("country", DataType::Utf8, true),
        Field::new("market_segment", DataType::Utf8, false),
        Field::new("adr", DataType::Float64, false),
        Field::new("total_of_special_requests", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(strings(&cols.hotel)),
            Arc::new(Int64Array::from(cols.is_canceled.clone())),
            Arc::new(Int64Array::from(cols.lead_time.clone())),
            Arc::new(Int64Array::from(cols.year.clone())),
            Arc::new(strings(&cols.month)),
            Arc::new(Int64Array::from(cols.adults.clone())),
            Arc::new(StringArray::from(cols.country.clone())),
            Arc::new(strings(&cols.segment)),
            Arc::new(Float64Array::from(cols.adr.clone())),
            Arc::new(Int64Array::from(cols.special_requests.clone())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let cols = generate(&mut rng);

    write_csv(&cols, "sample_hotels.csv")?;
    write_parquet(&cols, "sample_hotels.parquet")?;

    println!(
        "Wrote {} bookings to sample_hotels.csv and sample_hotels.parquet",
        cols.year.len()
    );
    Ok(())
}
