//! Example: Refine a grid into a pack
//!
//! Runs the full conversion: coarse grid, coastline densification, feature
//! classification and buffer export.

use rust_voronoi_coastline::*;

fn main() {
    println!("Grid to Pack Conversion Example");
    println!("===============================\n");

    let config = GridConfigBuilder::new()
        .seed(7)
        .size(600.0, 400.0)
        .unwrap()
        .cells_desired(4000)
        .unwrap()
        .build()
        .unwrap();

    // Continent with an inland lake and a small island offshore
    let continent = Point::new(250.0, 200.0);
    let lake = Point::new(290.0, 230.0);
    let islet = Point::new(480.0, 120.0);
    let sampler = |p: Point| -> u8 {
        if p.distance(lake) < 35.0 {
            10
        } else if p.distance(continent) < 150.0 || p.distance(islet) < 25.0 {
            45
        } else {
            5
        }
    };

    let grid = Grid::generate(&config, &sampler).expect("Failed to generate grid");
    let pack = Pack::generate(&grid).expect("Failed to refine grid");

    println!("Grid cells: {}", grid.cell_count());
    println!("Pack cells: {}", pack.cell_count());
    println!("Land cells: {}", pack.land_cells().count());
    println!();

    println!("Features:");
    for feature in pack.features() {
        println!(
            "  #{} {:<6} {:<11} {:>5} cells, seed cell {}",
            feature.id,
            feature.kind.name(),
            feature.group.name(),
            feature.cell_count,
            feature.seed_cell
        );
    }

    let deepest = pack.coast_types().iter().copied().max().unwrap_or(0);
    println!("\nInland rings: 1..={}", deepest);

    if let Some(cell) = pack.land_cells().find_map(|id| pack.cell(id).filter(|c| c.haven.is_some())) {
        println!(
            "Cell {} at ({:.1}, {:.1}): haven {:?}, harbor {}, area {}",
            cell.id, cell.point.x, cell.point.y, cell.haven, cell.harbor, cell.area
        );
    }

    #[cfg(feature = "spatial-index")]
    if let Some(id) = pack.find_cell_at(continent) {
        println!("Continent center lies in cell {} (ring {})", id, pack.coast_types()[id]);
    }

    let buffers = PackBuffers::from_pack(&pack).expect("Failed to export buffers");
    println!(
        "\nExported {} cells, source index width {:?}",
        buffers.cell_count(),
        buffers.source_cells.width()
    );
}
