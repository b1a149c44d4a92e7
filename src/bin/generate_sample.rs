use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

const ZONES: usize = 400;
const MODELS: usize = 3;

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

    /// Uniform jitter in `[-amplitude, amplitude]`.
    fn jitter(&mut self, amplitude: f64) -> f64 {
        (2.0 * self.next_f64() - 1.0) * amplitude
    }
}

/// One zone of a toy stellar model with density ρ_c (1 - x²), x = r/R.
struct Zone {
    mass: f64,
    radius: f64,
    log_t: f64,
    log_rho: f64,
    log_p: f64,
    luminosity: f64,
}

fn build_model(
    star_mass: f64,
    star_radius: f64,
    rho_c: f64,
    t_c: f64,
    rng: &mut SimpleRng,
) -> Vec<Zone> {
    // Surface first, matching the usual profile ordering.
    (0..ZONES)
        .map(|i| {
            let x = 1.0 - i as f64 / ZONES as f64;
            let rho = (rho_c * (1.0 - x * x)).max(1e-10);
            let t = t_c * (1.0 - 0.8 * x * x);
            let p = rho * t * 8.314e7 / 0.6;
            let m = star_mass * (5.0 * x.powi(3) - 3.0 * x.powi(5)) / 2.0;
            let l = (1.0 - (-6.0 * x).exp()) * (1.0 + rng.jitter(0.01));
            Zone {
                mass: m,
                radius: x * star_radius,
                log_t: t.log10(),
                log_rho: rho.log10(),
                log_p: p.log10(),
                luminosity: l,
            }
        })
        .collect()
}

fn write_profile(
    path: &Path,
    model_number: usize,
    star_age: f64,
    star_mass: f64,
    zones: &[Zone],
) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);

    writeln!(out, "{:>28}{:>28}{:>28}{:>28}", 1, 2, 3, 4)?;
    writeln!(
        out,
        "{:>28}{:>28}{:>28}{:>28}",
        "model_number", "star_age", "star_mass", "version_number"
    )?;
    writeln!(
        out,
        "{:>28}{:>28.16E}{:>28.16E}{:>28}",
        model_number, star_age, star_mass, "\"synthetic\""
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "{:>8}{:>26}{:>26}{:>26}{:>26}{:>26}{:>26}",
        "zone", "mass", "radius", "logT", "log_rho", "log_P", "luminosity"
    )?;
    for (i, z) in zones.iter().enumerate() {
        writeln!(
            out,
            "{:>8}{:>26.16E}{:>26.16E}{:>26.16E}{:>26.16E}{:>26.16E}{:>26.16E}",
            i + 1,
            z.mass,
            z.radius,
            z.log_t,
            z.log_rho,
            z.log_p,
            z.luminosity
        )?;
    }
    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let mut rng = SimpleRng::new(42);

    for n in 1..=MODELS {
        // Contracting core: denser and hotter with age.
        let age = 1.0e9 * n as f64;
        let rho_c = 80.0 * (1.0 + 0.5 * n as f64);
        let t_c = 1.3e7 * (1.0 + 0.1 * n as f64);
        let radius = 1.0 / (1.0 + 0.05 * n as f64);

        let zones = build_model(1.0, radius, rho_c, t_c, &mut rng);
        let path = out_dir.join(format!("profile{n}.data"));
        write_profile(&path, 100 * n, age, 1.0, &zones)?;
        println!("Wrote {} zones to {}", zones.len(), path.display());
    }

    Ok(())
}
