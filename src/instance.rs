use crate::bitset::BitString;
use crate::error::BenchError;
use std::fs;
use std::path::Path;

/// An immutable ρMNK-landscape loaded from a text file.
///
/// Parameters: ρ ∈ (−1/(M−1), 1], M ≥ 1 objectives, N ≥ 1 bits, K ∈ [0, N−1]
/// epistasis degree. Evaluating a bitstring `x` against objective `m`, bit
/// `i`, packs the `K+1` bits linked to `i` into an index and looks the
/// contribution up in a precomputed table; the bitstring itself is never
/// normalized or otherwise transformed at load time.
#[derive(Debug, Clone)]
pub struct Instance {
    rho: f64,
    m: usize,
    n: usize,
    k: usize,
    /// `links[m][i]` — the `K+1` bit indices (in `[0, N)`) feeding objective
    /// `m`'s position `i`.
    links: Vec<Vec<Vec<usize>>>,
    /// `tables[m][i]` — `2^(K+1)` contributions indexed by the packed value
    /// of the linked bits.
    tables: Vec<Vec<Vec<f64>>>,
}

struct Tokens {
    items: std::collections::VecDeque<String>,
}

impl Tokens {
    fn from_file(path: &Path) -> Result<Self, BenchError> {
        let content = fs::read_to_string(path)
            .map_err(|e| BenchError::Io(path.display().to_string(), e.to_string()))?;
        let mut items = std::collections::VecDeque::new();
        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('c') {
                continue;
            }
            items.extend(trimmed.split_whitespace().map(str::to_string));
        }
        Ok(Self { items })
    }

    fn next(&mut self, path: &Path, what: &str) -> Result<String, BenchError> {
        self.items
            .pop_front()
            .ok_or_else(|| BenchError::MalformedInstance(path.display().to_string(), format!("expected {what}, found end of file")))
    }

    fn expect_header(&mut self, path: &Path, name: &str) -> Result<(), BenchError> {
        let p = self.next(path, "header 'p'")?;
        if p != "p" {
            return Err(BenchError::MalformedInstance(
                path.display().to_string(),
                format!("expected header 'p {name}', found token '{p}'"),
            ));
        }
        let tag = self.next(path, &format!("header name '{name}'"))?;
        if tag != name {
            return Err(BenchError::MalformedInstance(
                path.display().to_string(),
                format!("expected header 'p {name}', found 'p {tag}'"),
            ));
        }
        Ok(())
    }

    fn next_f64(&mut self, path: &Path, what: &str) -> Result<f64, BenchError> {
        let tok = self.next(path, what)?;
        tok.parse::<f64>().map_err(|_| {
            BenchError::MalformedInstance(path.display().to_string(), format!("expected {what}, found non-numeric token '{tok}'"))
        })
    }

    fn next_usize(&mut self, path: &Path, what: &str) -> Result<usize, BenchError> {
        let tok = self.next(path, what)?;
        tok.parse::<usize>().map_err(|_| {
            BenchError::MalformedInstance(path.display().to_string(), format!("expected {what}, found non-numeric token '{tok}'"))
        })
    }
}

impl Instance {
    /// Parse an instance from `path`.
    ///
    /// Lines beginning with `c` are comments and are skipped whole. The
    /// header `p rMNK` is followed by `ρ M N K`; the header `p links` is
    /// followed by `M·N·(K+1)` integers read in order `i, j, m`; the header
    /// `p tables` is followed by `M·N·2^(K+1)` doubles read in the same
    /// nested order. Any missing header, non-numeric token, wrong token
    /// count, or out-of-range `links` index fails with
    /// [`BenchError::MalformedInstance`] naming the offending token.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BenchError> {
        let path = path.as_ref();
        let mut toks = Tokens::from_file(path)?;

        toks.expect_header(path, "rMNK")?;
        let rho = toks.next_f64(path, "rho")?;
        let m = toks.next_usize(path, "M")?;
        let n = toks.next_usize(path, "N")?;
        let k = toks.next_usize(path, "K")?;

        if m == 0 || n == 0 {
            return Err(BenchError::MalformedInstance(
                path.display().to_string(),
                format!("M and N must be at least 1, got M={m} N={n}"),
            ));
        }
        if k + 1 > n {
            return Err(BenchError::MalformedInstance(
                path.display().to_string(),
                format!("K={k} requires at least {} bits but N={n}", k + 1),
            ));
        }

        toks.expect_header(path, "links")?;
        let mut links = vec![vec![Vec::new(); n]; m];
        for i in 0..n {
            for j in 0..(k + 1) {
                for mm in 0..m {
                    let idx = toks.next_usize(path, &format!("links[{mm}][{i}][{j}]"))?;
                    if idx >= n {
                        return Err(BenchError::MalformedInstance(
                            path.display().to_string(),
                            format!("links[{mm}][{i}][{j}] = {idx} is out of range for N={n}"),
                        ));
                    }
                    links[mm][i].push(idx);
                }
            }
        }

        toks.expect_header(path, "tables")?;
        let table_size = 1usize << (k + 1);
        let mut tables = vec![vec![vec![0.0f64; table_size]; n]; m];
        for i in 0..n {
            for j in 0..table_size {
                for mm in 0..m {
                    tables[mm][i][j] = toks.next_f64(path, &format!("tables[{mm}][{i}][{j}]"))?;
                }
            }
        }

        log::info!("loaded rho-MNK instance from '{}': rho={rho}, M={m}, N={n}, K={k}", path.display());

        Ok(Self { rho, m, n, k, links, tables })
    }

    pub fn rho(&self) -> f64 {
        self.rho
    }

    pub fn m(&self) -> usize {
        self.m
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Pack the `K+1` bits linked to position `i` of objective `m` into an
    /// integer, with the `j`-th linked bit occupying bit `j`.
    fn sigma(&self, m: usize, x: &BitString, i: usize) -> usize {
        let mut code = 0usize;
        for (j, &bit_index) in self.links[m][i].iter().enumerate() {
            if x.get(bit_index) {
                code |= 1 << j;
            }
        }
        code
    }

    /// Evaluate bitstring `x` (of length `n()`) against all `m()`
    /// objectives, returning `y[m] = (1/N) Σᵢ tables[m][i][σ(m,x,i)]`. Pure;
    /// thread-safe under concurrent reads since `self` is never mutated.
    pub fn evaluate(&self, x: &BitString) -> Vec<f64> {
        assert_eq!(x.len(), self.n, "bitstring length does not match instance N");
        (0..self.m)
            .map(|m| {
                let sum: f64 = (0..self.n).map(|i| self.tables[m][i][self.sigma(m, x, i)]).sum();
                sum / self.n as f64
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn write_instance(contents: &str) -> tempfile_like::NamedFile {
        tempfile_like::NamedFile::new(contents)
    }

    /// A tiny drop-in for a temp file, to avoid pulling in a dev-dependency
    /// just for this module's fixtures.
    mod tempfile_like {
        use std::fs::File;
        use std::io::Write;
        use std::path::PathBuf;

        pub struct NamedFile {
            path: PathBuf,
        }

        impl NamedFile {
            pub fn new(contents: &str) -> Self {
                let mut path = std::env::temp_dir();
                path.push(format!("rmnk_bench_test_{}_{}.txt", std::process::id(), rand_suffix()));
                let mut f = File::create(&path).unwrap();
                f.write_all(contents.as_bytes()).unwrap();
                Self { path }
            }

            pub fn path(&self) -> &std::path::Path {
                &self.path
            }
        }

        impl Drop for NamedFile {
            fn drop(&mut self) {
                let _ = std::fs::remove_file(&self.path);
            }
        }

        fn rand_suffix() -> u64 {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap().subsec_nanos() as u64
        }
    }

    #[test]
    fn sigma_worked_example() {
        // M=1, N=3, K=1: links[0][0] = [2, 0]
        let contents = "\
c tiny fixture
p rMNK
0.0 1 3 1
p links
2 0 1 1 0 0
p tables
0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0
0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0
0.0 0.0 0.0 0.0 0.0 0.0 0.0 0.0
";
        let file = write_instance(contents);
        let instance = Instance::load(file.path()).unwrap();
        let mut x = BitString::zeros(3);
        x.set(0, true);
        x.set(2, true);
        // sigma = x[2]*1 + x[0]*2 = 1 + 2 = 3
        assert_eq!(instance.sigma(0, &x, 0), 3);
    }

    #[test]
    fn evaluate_averages_per_bit_contributions() {
        // M=1, N=2, K=0: links[0][i] = [i]; table[0][i] = [0.0, 1.0]
        let contents = "\
p rMNK
0.0 1 2 0
p links
0
1
p tables
0.0 1.0
0.0 1.0
";
        let file = write_instance(contents);
        let instance = Instance::load(file.path()).unwrap();
        let mut x = BitString::zeros(2);
        x.set(0, true);
        // y = (table[0][0][1] + table[0][1][0]) / 2 = (1.0 + 0.0)/2 = 0.5
        assert_eq!(instance.evaluate(&x), vec![0.5]);
    }

    #[test]
    fn flipping_unlinked_bit_leaves_objective_unchanged() {
        let contents = "\
p rMNK
0.0 1 2 0
p links
0
1
p tables
0.0 1.0
2.0 2.0
";
        let file = write_instance(contents);
        let instance = Instance::load(file.path()).unwrap();
        let mut x = BitString::zeros(2);
        let before = instance.evaluate(&x);
        // flip bit 1; objective 0's only contribution for bit 0 is table[0][0][x[0]],
        // which does not involve bit 1 at all (links[0][0] = [0]).
        x.flip(1);
        let after = instance.evaluate(&x);
        // table[0][1] is constant (2.0, 2.0) so flipping bit 1 changes nothing.
        assert_eq!(before, after);
    }

    #[test]
    fn all_zero_and_all_one_decisions_differ() {
        let contents = "\
p rMNK
0.0 1 2 0
p links
0
1
p tables
0.0 1.0
0.0 1.0
";
        let file = write_instance(contents);
        let instance = Instance::load(file.path()).unwrap();
        let zeros = BitString::zeros(2);
        let mut ones = BitString::zeros(2);
        ones.set(0, true);
        ones.set(1, true);
        assert_ne!(instance.evaluate(&zeros), instance.evaluate(&ones));
    }

    #[test]
    fn missing_header_is_malformed() {
        let contents = "p rMNK\n0.0 1 2 0\np links\n0\n1\n";
        let file = write_instance(contents);
        assert!(Instance::load(file.path()).is_err());
    }

    #[test]
    fn out_of_range_link_index_is_malformed() {
        let contents = "\
p rMNK
0.0 1 2 0
p links
5
1
p tables
0.0 1.0
0.0 1.0
";
        let file = write_instance(contents);
        assert!(Instance::load(file.path()).is_err());
    }

    #[test]
    fn non_numeric_token_is_malformed() {
        let contents = "p rMNK\nabc 1 2 0\n";
        let file = write_instance(contents);
        assert!(Instance::load(file.path()).is_err());
    }
}
