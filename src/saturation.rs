/// Sequencing effort needed to move from the current to a target
/// coverage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdditionalReads {
    /// fold coverage still missing
    pub coverage: f64,
    /// reads needed if every new read were unique
    pub reads: f64,
    /// reads needed after discounting duplicates
    pub reads_adjusted: f64,
}

impl AdditionalReads {
    const NONE_NEEDED: Self = Self {
        coverage: 0.0,
        reads: 0.0,
        reads_adjusted: 0.0,
    };
}

/// Fraction of reads that are not duplicates
pub fn saturation_fraction(percent_duplication: f64) -> f64 {
    1.0 - percent_duplication
}

/// Estimate how many more reads bring a library to `target_coverage`.
///
/// Coverage is assumed to grow linearly with unique reads, so the
/// missing coverage is scaled by reads-per-fold of the current run
/// and inflated by the duplicate fraction.
///
/// * `current_reads` - reads sequenced so far
/// * `current_coverage` - mean fold coverage reached so far
/// * `target_coverage` - desired mean fold coverage
/// * `saturation_fraction` - 1 - duplication rate
///
/// Returns `None` when the current coverage is not positive, since
/// there is no reads-per-fold rate to extrapolate from. A library at
/// or above the target needs zero reads. A fully saturated library
/// (no unique reads) can never reach the target, which is reported as
/// infinitely many adjusted reads.
///
pub fn additional_reads(
    current_reads: f64,
    current_coverage: f64,
    target_coverage: f64,
    saturation_fraction: f64,
) -> Option<AdditionalReads> {
    if !(current_coverage > 0.0) {
        return None;
    }

    let coverage = target_coverage - current_coverage;
    if coverage <= 0.0 {
        return Some(AdditionalReads::NONE_NEEDED);
    }

    let reads = current_reads * (coverage / current_coverage);

    let reads_adjusted = if saturation_fraction > 0.0 {
        reads / saturation_fraction
    } else {
        f64::INFINITY
    };

    Some(AdditionalReads {
        coverage,
        reads,
        reads_adjusted,
    })
}

/// Round a count for display: millions with one decimal at or above
/// one million, the nearest integer below. Rounds the exact binary
/// value with ties to even, as decimal formatting does.
///
/// `format_number_readable(12_345_678.0) == 12.3`
///
pub fn format_number_readable(num: f64) -> f64 {
    const MILLION: f64 = 1_000_000.0;
    let text = if num >= MILLION {
        format!("{:.1}", num / MILLION)
    } else {
        format!("{:.0}", num)
    };
    text.parse::<f64>().unwrap_or(num)
}
