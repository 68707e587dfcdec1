use anyhow::{Context, Result};

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

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// Draw a result given the probability of being tested and of resistance.
fn draw_result(rng: &mut SimpleRng, p_tested: f64, p_resistant: f64) -> &'static str {
    if rng.next_f64() > p_tested {
        return "-";
    }
    let r = rng.next_f64();
    if r < p_resistant {
        "Resistente"
    } else if r < p_resistant + 0.05 {
        "Intermediário"
    } else {
        "Sensível"
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let units = ["UTI Adulto", "UTI Neonatal", "Clínica Médica", "Pronto Socorro"];
    let months = ["Janeiro", "Fevereiro", "Março", "Abril"];
    let organisms = [
        "Escherichia coli",
        "Klebsiella pneumoniae",
        "Staphylococcus aureus",
        "Pseudomonas aeruginosa",
        "Não Identificado",
    ];

    // (antibiotic, probability tested, probability resistant)
    let antibiotics: [(&str, f64, f64); 8] = [
        ("AMPICILINA", 0.7, 0.6),
        ("AMOXICILINA/CLAVULANATO", 0.6, 0.35),
        ("CEFTRIAXONA", 0.8, 0.3),
        ("CEFEPIME", 0.5, 0.2),
        ("MEROPENEM", 0.9, 0.1),
        ("PIPERACILINA-TAZOBACTAM", 0.6, 0.15),
        ("VANCOMICINA", 0.3, 0.05),
        ("CIPROFLOXACINO", 0.8, 0.4),
    ];

    let output_path = "resultado_final_ccih.csv";
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;

    let mut header = vec!["Código da O.S.", "Unidade", "Mês", "Microorganismo"];
    header.extend(antibiotics.iter().map(|(name, _, _)| *name));
    writer.write_record(&header)?;

    let n_rows = 400;
    for case in 0..n_rows {
        let mut record = vec![
            format!("OS{:06}", 100_000 + case),
            rng.pick(&units).to_string(),
            rng.pick(&months).to_string(),
            rng.pick(&organisms).to_string(),
        ];
        for &(_, p_tested, p_resistant) in &antibiotics {
            record.push(draw_result(&mut rng, p_tested, p_resistant).to_string());
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;

    println!(
        "Wrote {n_rows} isolates ({} antibiotics each) to {output_path}",
        antibiotics.len()
    );
    Ok(())
}
