//! Analyze a generated sample month and print the trend estimate

use healthtrend::pipeline;
use healthtrend::sample::SampleGenerator;

fn main() {
    let csv = match SampleGenerator::new().generate_csv() {
        Ok(csv) => csv,
        Err(e) => {
            eprintln!("Error: {e:?}");
            return;
        }
    };

    match pipeline::analyze_csv(&csv) {
        Ok(analysis) => {
            println!(
                "kept {} of {} rows",
                analysis.cleaning.rows_kept, analysis.cleaning.rows_read
            );
            if let Some(prediction) = &analysis.prediction {
                println!(
                    "predicted weight {}: {:.2} lbs (mean activity score {:.3})",
                    prediction.direction.as_str(),
                    prediction.weight_change_lbs.abs(),
                    prediction.mean_activity_score,
                );
            }
        }
        Err(e) => eprintln!("Error: {e:?}"),
    }
}
