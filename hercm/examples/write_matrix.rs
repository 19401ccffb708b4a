//! Build a banded matrix, fold it to symmetric storage and write it out

use hercm::{CodecConfig, Matrix, TransformPolicy};
use std::time::Instant;

fn main() -> hercm::Result<()> {
    let n = 2_000;
    println!("Building {n} x {n} pentadiagonal matrix...");

    let start = Instant::now();
    let mut matrix = Matrix::new(n, n)?;
    matrix.paint_diagonal(0, n, 2, -1.0, 0)?;
    matrix.paint_diagonal(0, n, 0, 4.0, 0)?;
    matrix.add_remark("pentadiagonal-demo");
    println!(
        "Painted {} entries in {:?}",
        matrix.nzentries(),
        start.elapsed()
    );

    let start = Instant::now();
    matrix.make_symmetrical(TransformPolicy::Truncate)?;
    println!(
        "Folded to symmetric storage ({} stored entries) in {:?}",
        matrix.nzentries(),
        start.elapsed()
    );

    let verification = matrix.refresh_verification();
    println!("Verification sum: {verification:?}");

    let start = Instant::now();
    let config = CodecConfig::default().with_tokens_per_line(12);
    hercm::save_with(&matrix, "example_matrix.hercm", &config)?;
    println!("Written in {:?}", start.elapsed());
    println!("\nRun 'cargo run --example read_matrix' to read it back!");
    Ok(())
}
