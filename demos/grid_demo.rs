//! Example: Generate a coarse grid
//!
//! Demonstrates grid generation with a height sampler and the derived markup.

use rust_voronoi_coastline::*;

fn main() {
    println!("Coarse Grid Example");
    println!("===================\n");

    let config = GridConfigBuilder::new()
        .seed(42)
        .size(480.0, 270.0)
        .unwrap()
        .cells_desired(2500)
        .unwrap()
        .build()
        .unwrap();

    println!("Configuration:");
    println!("  Seed: {}", config.seed);
    println!("  Size: {} x {}", config.width, config.height);
    println!("  Spacing: {}", config.spacing());
    println!("  Lattice: {} x {}", config.cells_x(), config.cells_y());
    println!();

    // Two overlapping blobs of land
    let west = Point::new(160.0, 140.0);
    let east = Point::new(330.0, 120.0);
    let sampler = |p: Point| -> u8 {
        let d = (p.distance(west) / 90.0).min(p.distance(east) / 60.0);
        if d < 1.0 {
            (20.0 + 60.0 * (1.0 - d)) as u8
        } else {
            (19.0 * (1.0 - (d - 1.0).min(1.0))) as u8
        }
    };

    let grid = Grid::generate(&config, &sampler).expect("Failed to generate grid");
    println!("Generated {} cells\n", grid.cell_count());

    let land = grid.heights().iter().filter(|&&h| is_land(h)).count();
    let border = grid.graph().border.iter().filter(|&&b| b).count();
    println!("Statistics:");
    println!("  Land cells: {}", land);
    println!("  Border cells: {}", border);
    println!();

    println!("Features:");
    for feature in grid.features() {
        println!(
            "  #{} {:<6} {:<10} {:>5} cells, border={}",
            feature.id,
            feature.kind.name(),
            feature.group.name(),
            feature.cell_count,
            feature.touches_border
        );
    }

    println!("\nCoast types:");
    for t in -9..=1i8 {
        let count = grid.coast_types().iter().filter(|&&c| c == t).count();
        if count > 0 {
            println!("  {:>3}: {}", t, count);
        }
    }
}
