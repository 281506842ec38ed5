/// True if every base is one of the upper-case nucleotides A, C, G, T.
#[inline]
pub fn is_acgt(seq: &[u8]) -> bool {
    seq.iter().all(|&b| matches!(b, b'A' | b'C' | b'G' | b'T'))
}

/// Yields every k-length window of `seq` made only of A/C/G/T, in read order.
///
/// A window containing any other character is dropped on its own; neighbouring
/// windows are unaffected. Sequences shorter than `k` yield nothing.
pub fn valid_kmers(seq: &str, k: usize) -> impl Iterator<Item = &str> + '_ {
    let bytes = seq.as_bytes();
    let count = if k == 0 || bytes.len() < k { 0 } else { bytes.len() - k + 1 };
    (0..count)
        .filter(move |&i| is_acgt(&bytes[i..i + k]))
        .map(move |i| &seq[i..i + k])
}

/// Split a k-mer into its (k-1)-length prefix and suffix.
#[inline]
pub fn split_kmer(kmer: &str) -> (&str, &str) {
    let k = kmer.len();
    (&kmer[..k - 1], &kmer[1..])
}
