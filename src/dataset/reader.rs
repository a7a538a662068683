use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
    str::FromStr,
};

use log::{debug, info};

use super::Sample;
use crate::{DescentErr, Result};

/// Value of the intercept feature prepended to every sample.
pub const BIAS: f64 = 1.0;

/// Reads samples from a whitespace delimited text stream.
///
/// The stream starts with the number of samples and the number of features, followed by one
/// row per sample holding its features and then its single target. A bias feature is
/// prepended to every row, so each resulting sample has `features + 1` features.
///
/// # Arguments
/// * `reader` - The source of the text.
///
/// # Returns
/// The parsed samples, or an error if a token is invalid, the header counts overflow, the
/// stream is truncated or no samples are declared.
pub fn read_samples<R: Read>(mut reader: R) -> Result<Vec<Sample>> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;

    let mut tokens = Tokens::new(&text);
    let nsamples: usize = tokens.next_parsed(2)?;
    let nfeatures: usize = tokens.next_parsed(2)?;
    info!("# of samples: {nsamples}, # of features: {nfeatures}");

    if nsamples == 0 {
        return Err(DescentErr::EmptyDataset);
    }

    let expected = nfeatures
        .checked_add(1)
        .and_then(|row| row.checked_mul(nsamples))
        .and_then(|values| values.checked_add(2))
        .ok_or_else(|| DescentErr::DatasetParse {
            token: format!("{nsamples} {nfeatures}"),
            position: 0,
        })?;

    // The header is checked against the stream before anything is sized from it.
    let available = text.split_whitespace().count();
    if available < expected {
        return Err(DescentErr::DatasetTruncated {
            expected,
            got: available,
        });
    }

    let samples = (0..nsamples)
        .map(|_| {
            let mut features = Vec::with_capacity(nfeatures + 1);
            features.push(BIAS);
            for _ in 0..nfeatures {
                features.push(tokens.next_parsed(expected)?);
            }

            let target = tokens.next_parsed(expected)?;
            Ok(Sample::new(features, vec![target]))
        })
        .collect::<Result<Vec<_>>>()?;

    for (i, sample) in samples.iter().enumerate() {
        debug!("sample {i}: {sample}");
    }

    Ok(samples)
}

/// Opens `path` and reads its samples, see [`read_samples`].
pub fn load_samples<P: AsRef<Path>>(path: P) -> Result<Vec<Sample>> {
    let path = path.as_ref();
    info!("loading dataset from {}", path.display());

    let file = File::open(path)?;
    read_samples(BufReader::new(file))
}

struct Tokens<'a> {
    inner: std::str::SplitWhitespace<'a>,
    position: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.split_whitespace(),
            position: 0,
        }
    }

    fn next_parsed<T: FromStr>(&mut self, expected: usize) -> Result<T> {
        let token = self.inner.next().ok_or(DescentErr::DatasetTruncated {
            expected,
            got: self.position,
        })?;

        let position = self.position;
        self.position += 1;

        token.parse().map_err(|_| DescentErr::DatasetParse {
            token: token.to_string(),
            position,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepends_bias() {
        let text = "2 2\n1 2 3\n4 5 6\n";
        let samples = read_samples(text.as_bytes()).unwrap();

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].features(), [1., 1., 2.]);
        assert_eq!(samples[0].targets(), [3.]);
        assert_eq!(samples[1].features(), [1., 4., 5.]);
        assert_eq!(samples[1].targets(), [6.]);
    }

    #[test]
    fn rows_may_span_lines() {
        let text = "1 1 0.5\n\n  1.5";
        let samples = read_samples(text.as_bytes()).unwrap();

        assert_eq!(samples[0].features(), [1., 0.5]);
        assert_eq!(samples[0].target(), Some(1.5));
    }

    #[test]
    fn truncated() {
        let text = "2 1\n1 2\n3";
        let err = read_samples(text.as_bytes()).unwrap_err();

        assert!(matches!(
            err,
            DescentErr::DatasetTruncated {
                expected: 6,
                got: 5
            }
        ));
    }

    #[test]
    fn header_counts_overflow() {
        for text in ["18446744073709551615 1\n1 2", "1 18446744073709551615\n1 2"] {
            let err = read_samples(text.as_bytes()).unwrap_err();
            assert!(matches!(err, DescentErr::DatasetParse { position: 0, .. }));
        }
    }

    #[test]
    fn header_larger_than_stream() {
        let err = read_samples("1 100000000000\n1 2".as_bytes()).unwrap_err();

        assert!(matches!(
            err,
            DescentErr::DatasetTruncated {
                expected: 100_000_000_003,
                got: 4
            }
        ));
    }

    #[test]
    fn invalid_token() {
        let text = "1 1\n1 x";
        let err = read_samples(text.as_bytes()).unwrap_err();

        assert!(matches!(err, DescentErr::DatasetParse { position: 3, .. }));
    }

    #[test]
    fn no_samples() {
        let err = read_samples("0 3".as_bytes()).unwrap_err();
        assert!(matches!(err, DescentErr::EmptyDataset));
    }

    #[test]
    fn missing_file() {
        let err = load_samples("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, DescentErr::Io(_)));
    }
}
