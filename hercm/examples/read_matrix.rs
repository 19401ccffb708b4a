//! Read the matrix written by `write_matrix` and query it

use hercm::{HercmFile, MatrixOperations, SparseMatrix};
use std::time::Instant;

fn main() -> hercm::Result<()> {
    let filename = "example_matrix.hercm";

    if !std::path::Path::new(filename).exists() {
        println!("File '{filename}' not found!");
        println!("   Run 'cargo run --example write_matrix' first");
        return Ok(());
    }

    let start = Instant::now();
    let file = HercmFile::open(filename)?;
    println!("Header parsed in {:?}", start.elapsed());

    let header = &file.header;
    println!("\nMatrix Information:");
    println!("   Dimensions: {} x {}", header.height, header.width);
    println!("   Stored entries: {}", header.nzentries);
    println!("   Symmetry: {}", header.symmetry);
    println!("   Verification: {:?}", header.verification);

    let start = Instant::now();
    let matrix = file.read_matrix(&Default::default())?;
    println!("\nLoaded and verified in {:?}", start.elapsed());

    println!("\nPoint access (upper triangle is extrapolated):");
    for (row, col) in [(0, 0), (0, 2), (2, 0), (10, 11), (10, 13)] {
        match matrix.get_element(row, col) {
            Some(value) => println!("   matrix[{row}, {col}] = {value}"),
            None => println!("   matrix[{row}, {col}] = 0 (not stored)"),
        }
    }

    let row = matrix.get_row(5);
    println!("\nRow 5 has {} nonzeros: {row:?}", row.len());

    let sub = matrix.range(0, 4, 0, 4)?;
    println!("\nTop-left 5 x 5 block:");
    for r in 0..5 {
        let cells: Vec<String> = (0..5)
            .map(|c| format!("{:>5}", sub.get_value(r, c).unwrap_or(0.0)))
            .collect();
        println!("   {}", cells.join(" "));
    }
    Ok(())
}
