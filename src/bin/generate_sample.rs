use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const STUDENTS: i64 = 846;
const STATUSES: [&str; 4] = ["Completed", "In Progress", "Dropped", "Not Started"];
const FIRST_NAMES: [&str; 8] = ["Amara", "Ben", "Chen", "Dalia", "Emil", "Farah", "Goran", "Hana"];

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
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
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

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// A score in `[0, max]`, rounded to one decimal.
fn score(rng: &mut SimpleRng, mean: f64, sd: f64, max: f64) -> f64 {
    (rng.gauss(mean, sd).clamp(0.0, max) * 10.0).round() / 10.0
}

struct Student {
    id: i64,
    name: String,
    status: &'static str,
    quizzes: [f64; 3],
    assignments: [f64; 3],
    attendance_rate: f64,
    attendance_final_score: f64,
    /// Text on purpose: a few cells hold non-numeric markers.
    final_score: String,
}

fn generate(rng: &mut SimpleRng) -> Vec<Student> {
    (1..=STUDENTS)
        .map(|id| {
            // Per-student ability drives every score a little.
            let ability = rng.gauss(0.0, 1.0);
            let quizzes = [0, 1, 2].map(|_| score(rng, 7.0 + ability, 1.5, 10.0));
            let assignments = [0, 1, 2].map(|_| score(rng, 75.0 + 8.0 * ability, 10.0, 100.0));
            let attendance_rate = (rng.gauss(0.85 + 0.05 * ability, 0.1).clamp(0.0, 1.0) * 100.0)
                .round()
                / 100.0;
            let attendance_final_score = score(rng, 100.0 * attendance_rate, 5.0, 100.0);

            let mean_assign = assignments.iter().sum::<f64>() / 3.0;
            let final_score = if rng.next_f64() < 0.02 {
                "absent".to_string()
            } else {
                let mean_quiz = quizzes.iter().sum::<f64>() / 3.0 * 10.0;
                let raw = 0.5 * mean_assign + 0.3 * mean_quiz + 0.2 * attendance_final_score;
                format!("{:.1}", (raw + rng.gauss(0.0, 3.0)).clamp(0.0, 100.0))
            };

            let status = if rng.next_f64() < 0.7 {
                STATUSES[0]
            } else {
                rng.pick(&STATUSES[1..])
            };

            Student {
                id,
                name: format!("{} {id:03}", rng.pick(&FIRST_NAMES)),
                status,
                quizzes,
                assignments,
                attendance_rate,
                attendance_final_score,
                final_score,
            }
        })
        .collect()
}

const HEADERS: [&str; 12] = [
    "id",
    "name",
    "completion_status",
    "quiz_1",
    "quiz_2",
    "quiz_3",
    "assignment_1",
    "assignment_2",
    "assignment_3",
    "attendance_rate",
    "attendance_final_score",
    "final_score",
];

fn write_csv(path: &str, students: &[Student]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record(HEADERS)?;
    for s in students {
        let mut record = vec![s.id.to_string(), s.name.clone(), s.status.to_string()];
        record.extend(s.quizzes.iter().map(|v| v.to_string()));
        record.extend(s.assignments.iter().map(|v| v.to_string()));
        record.push(s.attendance_rate.to_string());
        record.push(s.attendance_final_score.to_string());
        record.push(s.final_score.clone());
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn float_column(students: &[Student], f: impl Fn(&Student) -> f64) -> ArrayRef {
    Arc::new(Float64Array::from(students.iter().map(f).collect::<Vec<_>>()))
}

fn string_column<'a>(students: &'a [Student], f: impl Fn(&'a Student) -> &'a str) -> ArrayRef {
    Arc::new(StringArray::from(students.iter().map(f).collect::<Vec<_>>()))
}

fn write_parquet(path: &str, students: &[Student]) -> Result<()> {
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(students.iter().map(|s| s.id).collect::<Vec<_>>())) as ArrayRef,
        string_column(students, |s| s.name.as_str()),
        string_column(students, |s| s.status),
        float_column(students, |s| s.quizzes[0]),
        float_column(students, |s| s.quizzes[1]),
        float_column(students, |s| s.quizzes[2]),
        float_column(students, |s| s.assignments[0]),
        float_column(students, |s| s.assignments[1]),
        float_column(students, |s| s.assignments[2]),
        float_column(students, |s| s.attendance_rate),
        float_column(students, |s| s.attendance_final_score),
        string_column(students, |s| s.final_score.as_str()),
    ];

    let fields: Vec<Field> = HEADERS
        .iter()
        .zip(&columns)
        .map(|(name, col)| Field::new(*name, col.data_type().clone(), false))
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let students = generate(&mut rng);

    write_csv("sample_students.csv", &students)?;
    write_parquet("sample_students.parquet", &students)?;

    println!(
        "Wrote {} students to sample_students.csv and sample_students.parquet",
        students.len()
    );
    Ok(())
}
