use chrono::Utc;
use petri_core::snapshot::{
    AntibioticZone, Bacterium, BacteriumStatus, Coordinate, GridMeta, Snapshot,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const EXTENT: f64 = 100.0;
const CELLS: u32 = 100;

/// Random population spread over a 100x100 dish. Bacteria inside a zone lean
/// towards resistance.
pub fn generate(count: usize, zones: usize, seed: u64) -> Snapshot {
    let mut rng = StdRng::seed_from_u64(seed);

    let zones: Vec<AntibioticZone> = (0..zones)
        .map(|i| AntibioticZone {
            id: format!("zone-{i}"),
            center: Coordinate::new(rng.gen_range(10.0..90.0), rng.gen_range(10.0..90.0)),
            radius: rng.gen_range(5.0..15.0),
            concentration: rng.gen_range(0.1..1.0),
        })
        .collect();

    let bacteria: Vec<Bacterium> = (0..count)
        .map(|i| {
            let position = Coordinate::new(rng.gen_range(0.0..EXTENT), rng.gen_range(0.0..EXTENT));
            let exposed = zones.iter().any(|z| z.contains(position));
            let roll: f64 = rng.gen();
            let status = match (exposed, roll) {
                (true, r) if r < 0.6 => BacteriumStatus::Resistant,
                (true, r) if r < 0.85 => BacteriumStatus::Intermediate,
                (false, r) if r < 0.1 => BacteriumStatus::Resistant,
                (false, r) if r < 0.25 => BacteriumStatus::Intermediate,
                _ => BacteriumStatus::Sensitive,
            };
            Bacterium {
                id: format!("b{i}"),
                position,
                status,
                fitness: rng.gen(),
                generation: rng.gen_range(0..200),
            }
        })
        .collect();

    let cells = (CELLS * CELLS) as f64;
    let covered = (0..CELLS * CELLS)
        .filter(|k| {
            let c = Coordinate::new((k % CELLS) as f64 + 0.5, (k / CELLS) as f64 + 0.5);
            zones.iter().any(|z| z.contains(c))
        })
        .count();

    Snapshot {
        grid: GridMeta {
            width: CELLS,
            height: CELLS,
            physical_width: EXTENT,
            physical_height: EXTENT,
            occupancy_ratio: (bacteria.len() as f64 / cells).min(1.0),
            coverage_ratio: covered as f64 / cells,
        },
        bacteria,
        zones,
        timestamp: Utc::now(),
    }
}
