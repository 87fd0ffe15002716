//! Plain-text matrix cache files.
//!
//! The format is the dimension `N` on the first line, then `N` lines of
//! `N` whitespace-separated `u32` values in row order. Writing separates
//! values with a tab; reading accepts any whitespace.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::error::{Result, TransposeError};
use crate::matrix::SquareMatrix;

/// Write `matrix` to `path`, replacing any existing contents.
pub fn write_matrix<P: AsRef<Path>>(path: P, matrix: &SquareMatrix) -> Result<()> {
    let path = path.as_ref();
    let io_err = |source| TransposeError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut out = BufWriter::new(file);

    let n = matrix.size();
    writeln!(out, "{}", n).map_err(io_err)?;
    for row in matrix.as_slice().chunks_exact(n) {
        for (j, value) in row.iter().enumerate() {
            if j > 0 {
                out.write_all(b"\t").map_err(io_err)?;
            }
            write!(out, "{}", value).map_err(io_err)?;
        }
        out.write_all(b"\n").map_err(io_err)?;
    }
    out.flush().map_err(io_err)?;

    debug!(path = %path.display(), size = n, "wrote matrix cache");
    Ok(())
}

/// Read a matrix previously written by [`write_matrix`].
pub fn read_matrix<P: AsRef<Path>>(path: P) -> Result<SquareMatrix> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| TransposeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let matrix = parse_matrix(path, &text)?;
    debug!(path = %path.display(), size = matrix.size(), "read matrix cache");
    Ok(matrix)
}

fn parse_matrix(path: &Path, text: &str) -> Result<SquareMatrix> {
    let parse_err = |line: usize, reason: String| TransposeError::Parse {
        path: path.to_path_buf(),
        line,
        reason,
    };

    let mut lines = text.lines().enumerate().map(|(idx, l)| (idx + 1, l));
    let (_, header) = lines
        .next()
        .ok_or_else(|| parse_err(1, "missing dimension line".to_string()))?;
    let n: usize = header
        .trim()
        .parse()
        .map_err(|_| parse_err(1, format!("invalid dimension {:?}", header.trim())))?;
    if n == 0 {
        return Err(parse_err(1, "dimension must be non-zero".to_string()));
    }

    let expected = n
        .checked_mul(n)
        .ok_or_else(|| parse_err(1, format!("dimension {} too large", n)))?;
    // every value takes at least one digit and one separator
    let mut data = Vec::with_capacity(expected.min(text.len() / 2 + 1));
    let mut last_line = 1;
    for (line_no, line) in lines {
        last_line = line_no;
        for token in line.split_whitespace() {
            if data.len() == expected {
                return Err(parse_err(
                    line_no,
                    format!("more than {} values for a {}x{} matrix", expected, n, n),
                ));
            }
            let value: u32 = token
                .parse()
                .map_err(|_| parse_err(line_no, format!("invalid value {:?}", token)))?;
            data.push(value);
        }
    }

    if data.len() != expected {
        return Err(parse_err(
            last_line,
            format!("found {} of {} values", data.len(), expected),
        ));
    }
    SquareMatrix::from_vec(n, data)
}
