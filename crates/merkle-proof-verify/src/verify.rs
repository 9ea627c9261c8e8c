//! Inclusion proof verification by iterative hash chaining.

use tracing::debug;

use crate::error::{Result, VerifyError};
use crate::hasher::DigestHasher;

/// Recompute the root implied by `identifier` and its sibling path.
///
/// Starting from the identifier, every proof node is appended to the running value and the
/// concatenation is hashed. Nodes are consumed in the order given; an empty proof yields the
/// identifier itself.
pub fn compute_root<H>(hasher: &H, identifier: &str, proof: &[String]) -> String
where
    H: DigestHasher + ?Sized,
{
    proof.iter().fold(identifier.to_string(), |acc, node| {
        let mut input = String::with_capacity(acc.len() + node.len());
        input.push_str(&acc);
        input.push_str(node);
        hasher.hash(&input)
    })
}

/// Check that `identifier` is a leaf of the tree committed to by `known_root`.
pub fn verify<H>(hasher: &H, identifier: &str, proof: &[String], known_root: &str) -> bool
where
    H: DigestHasher + ?Sized,
{
    compute_root(hasher, identifier, proof) == known_root
}

/// Like [`verify`], but rejects nodes of the wrong width and reports both roots on mismatch.
pub fn verify_strict<H>(
    hasher: &H,
    identifier: &str,
    proof: &[String],
    known_root: &str,
) -> Result<()>
where
    H: DigestHasher + ?Sized,
{
    let width = hasher.digest_width();
    if let Some((index, node)) = proof.iter().enumerate().find(|(_, n)| n.len() != width) {
        return Err(VerifyError::NodeWidth {
            index,
            expected: width,
            actual: node.len(),
        });
    }

    let computed = compute_root(hasher, identifier, proof);
    debug!(
        hasher = hasher.name(),
        nodes = proof.len(),
        %computed,
        "Recomputed root"
    );

    if computed != known_root {
        return Err(VerifyError::RootMismatch {
            expected: known_root.to_string(),
            computed,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::Md5Hasher;

    /// FNV-1a rendered as 8 hex chars: deterministic, cheap and non-commutative over concatenation
    #[derive(Debug)]
    struct FnvHasher;

    impl DigestHasher for FnvHasher {
        fn name(&self) -> &'static str {
            "fnv1a"
        }

        fn digest_width(&self) -> usize {
            8
        }

        fn hash(&self, input: &str) -> String {
            let mut h: u32 = 0x811c9dc5;
            for b in input.bytes() {
                h ^= b as u32;
                h = h.wrapping_mul(0x01000193);
            }
            format!("{h:08x}")
        }
    }

    fn nodes(hasher: &dyn DigestHasher, seeds: &[&str]) -> Vec<String> {
        seeds.iter().map(|s| hasher.hash(s)).collect()
    }

    #[test]
    fn test_two_node_scenario() {
        let hasher = Md5Hasher;
        let proof = nodes(&hasher, &["A", "B"]);
        let root = hasher.hash(&(hasher.hash(&format!("tx1{}", proof[0])) + &proof[1]));

        assert!(verify(&hasher, "tx1", &proof, &root));

        let swapped = vec![proof[1].clone(), proof[0].clone()];
        assert!(!verify(&hasher, "tx1", &swapped, &root));
    }

    #[test]
    fn test_empty_proof_compares_identifier() {
        let hasher = Md5Hasher;
        let root = hasher.hash("leaf");
        assert!(verify(&hasher, &root, &[], &root));
        assert!(!verify(&hasher, "leaf", &[], &root));
    }

    #[test]
    fn test_single_byte_mutation_fails() {
        let hasher = Md5Hasher;
        let proof = nodes(&hasher, &["n0", "n1", "n2"]);
        let root = compute_root(&hasher, "tx42", &proof);
        assert!(verify(&hasher, "tx42", &proof, &root));

        for i in 0..proof.len() {
            let mut tampered = proof.clone();
            let mut bytes = tampered[i].clone().into_bytes();
            bytes[5] = if bytes[5] == b'0' { b'1' } else { b'0' };
            tampered[i] = String::from_utf8(bytes).unwrap();
            assert!(!verify(&hasher, "tx42", &tampered, &root), "node {i}");
        }
    }

    #[test]
    fn test_permutations_are_rejected() {
        let hasher = FnvHasher;
        let proof = nodes(&hasher, &["a", "b", "c"]);
        let root = compute_root(&hasher, "leaf", &proof);

        let permutations = [[0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
        for order in permutations {
            let permuted: Vec<String> = order.iter().map(|&i| proof[i].clone()).collect();
            assert!(!verify(&hasher, "leaf", &permuted, &root), "{order:?}");
        }
    }

    #[test]
    fn test_comparison_is_by_content() {
        let hasher = Md5Hasher;
        let proof = nodes(&hasher, &["x"]);
        let root = compute_root(&hasher, "tx", &proof);
        // A freshly built string with the same content must match
        let rebuilt: String = root.chars().collect();
        assert!(verify(&hasher, "tx", &proof, &rebuilt));
    }

    #[test]
    fn test_verify_strict_reports_mismatch() {
        let hasher = FnvHasher;
        let proof = nodes(&hasher, &["a"]);
        let computed = compute_root(&hasher, "leaf", &proof);

        assert_eq!(verify_strict(&hasher, "leaf", &proof, &computed), Ok(()));
        assert_eq!(
            verify_strict(&hasher, "leaf", &proof, "00000000"),
            Err(VerifyError::RootMismatch {
                expected: "00000000".to_string(),
                computed,
            })
        );
    }

    #[test]
    fn test_verify_strict_rejects_node_width() {
        let hasher = FnvHasher;
        let proof = vec![hasher.hash("a"), "abc".to_string()];
        assert_eq!(
            verify_strict(&hasher, "leaf", &proof, "00000000"),
            Err(VerifyError::NodeWidth {
                index: 1,
                expected: 8,
                actual: 3,
            })
        );
    }
}
