use std::path::PathBuf;

use anyhow::{Context, Result};
use image::{Rgb, RgbImage};

const WIDTH: u32 = 480;
const HEIGHT: u32 = 360;
/// Horizontal shift of the floating square between the two eyes.
const DISPARITY: u32 = 12;

/// Deterministic xorshift64 dot source, so reruns write identical files.
struct DotRng(u64);

impl DotRng {
    fn new(seed: u64) -> Self {
        // xorshift never leaves the all-zero state.
        DotRng(seed.max(1))
    }

    fn next_u64(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    fn dot(&mut self) -> Rgb<u8> {
        // Coarse 4-pixel dots survive JPEG compression.
        if self.next_u64() >> 63 == 0 {
            Rgb([20, 20, 20])
        } else {
            Rgb([235, 235, 235])
        }
    }
}

const CELL: u32 = 4;

fn dot_grid(rng: &mut DotRng) -> Vec<Rgb<u8>> {
    (0..(WIDTH / CELL) * (HEIGHT / CELL)).map(|_| rng.dot()).collect()
}

fn dot_at(dots: &[Rgb<u8>], x: u32, y: u32) -> Rgb<u8> {
    let cols = WIDTH / CELL;
    let col = (x / CELL).min(cols - 1);
    let row = (y / CELL).min(HEIGHT / CELL - 1);
    dots[(row * cols + col) as usize]
}

/// Random-dot pair: the right eye sees a central square shifted left by
/// `DISPARITY`, which fuses into a square floating above the background.
fn random_dot_pair(rng: &mut DotRng) -> (RgbImage, RgbImage) {
    let background = dot_grid(rng);
    let filler = dot_grid(rng);

    let square_rows = HEIGHT / 3..2 * HEIGHT / 3;
    let shifted = WIDTH / 3 - DISPARITY..2 * WIDTH / 3 - DISPARITY;
    let uncovered = 2 * WIDTH / 3 - DISPARITY..2 * WIDTH / 3;

    let left = RgbImage::from_fn(WIDTH, HEIGHT, |x, y| dot_at(&background, x, y));
    let right = RgbImage::from_fn(WIDTH, HEIGHT, |x, y| {
        if !square_rows.contains(&y) {
            dot_at(&background, x, y)
        } else if shifted.contains(&x) {
            dot_at(&background, x + DISPARITY, y)
        } else if uncovered.contains(&x) {
            dot_at(&filler, x, y)
        } else {
            dot_at(&background, x, y)
        }
    });
    (left, right)
}

fn main() -> Result<()> {
    let out_dir = PathBuf::from(std::env::args().nth(1).unwrap_or_else(|| ".".into()));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = DotRng::new(42);
    let (left, right) = random_dot_pair(&mut rng);

    for (name, image) in [("LeftEye.jpg", &left), ("RightEye.jpg", &right)] {
        let path = out_dir.join(name);
        image
            .save(&path)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Wrote {WIDTH}x{HEIGHT} random-dot image to {}", path.display());
    }
    Ok(())
}
