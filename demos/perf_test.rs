use conetrace::{ConeDetector, DetectorConfig, RgbImage};
use image::Rgb;
use std::time::{Duration, Instant};

fn synthetic_frame(width: u32, height: u32) -> RgbImage {
    let mut img = RgbImage::from_pixel(width, height, Rgb([60, 60, 64]));
    let cone_w = (width / 32).max(6);
    let cone_h = cone_w * 2;
    let y0 = height / 2;

    for i in 0..6 {
        for (x0, color) in [
            (i * cone_w * 2 + 4, Rgb([250, 200, 10])),
            (width - (i + 1) * cone_w * 2 - 4, Rgb([20, 40, 220])),
        ] {
            for y in y0..(y0 + cone_h).min(height) {
                for x in x0..(x0 + cone_w).min(width) {
                    let stripe = y >= y0 + cone_h / 2 - 2 && y < y0 + cone_h / 2 + 2;
                    img.put_pixel(x, y, if stripe { Rgb([245, 245, 245]) } else { color });
                }
            }
        }
    }
    img
}

fn main() {
    println!("=== conetrace Performance Test ===\n");

    let frames = [
        ("QVGA", synthetic_frame(320, 240)),
        ("VGA", synthetic_frame(640, 480)),
        ("720p", synthetic_frame(1280, 720)),
    ];

    for parallel in [true, false] {
        let detector = ConeDetector::new(DetectorConfig {
            parallel_channels: parallel,
            ..DetectorConfig::default()
        });
        println!("Channels: {}\n", if parallel { "parallel" } else { "sequential" });

        for (name, img) in &frames {
            println!("Testing {} ({}x{}):", name, img.width(), img.height());

            // Warmup run
            let _ = detector.run(img);

            let num_runs = 10;
            let mut times = Vec::new();

            for i in 1..=num_runs {
                let start = Instant::now();
                let output = detector.run(img);
                let elapsed = start.elapsed();
                times.push(elapsed);

                if i == 1 {
                    println!("  {} cones detected", output.len());
                }
            }

            let total: Duration = times.iter().sum();
            let avg = total / num_runs as u32;
            let min = times.iter().min().copied().unwrap_or_default();
            let max = times.iter().max().copied().unwrap_or_default();

            println!("  Average: {:?}", avg);
            println!("  Min: {:?}", min);
            println!("  Max: {:?}", max);
            println!("  Throughput: {:.2} frames/sec\n", 1.0 / avg.as_secs_f64());
        }
    }
}
