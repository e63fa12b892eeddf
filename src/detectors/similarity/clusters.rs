//! Cluster assembly from LSH candidate sets.
//!
//! The near-duplicate relation is symmetric, so clusters are connected
//! components of an undirected graph: one vertex per signed file, one edge
//! per LSH collision that survives re-thresholding on estimated similarity.
//! Components are tracked with a union-find over file indices; no pointer
//! graph is materialized.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::index::LshIndex;
use super::minhash::estimate_similarity;
use crate::io::report::{Cluster, ClusterType, FileRecord, SimilarityPair};

/// Builds the cluster table and writes `cluster_id` assignments back into the
/// file table.
#[derive(Debug, Clone)]
pub struct ClusterBuilder {
    similarity_threshold: f64,
    scaffold_min_size: usize,
}

impl ClusterBuilder {
    /// Create a builder with the detection threshold and the scaffold floor.
    pub fn new(similarity_threshold: f64, scaffold_min_size: usize) -> Self {
        Self {
            similarity_threshold,
            scaffold_min_size,
        }
    }

    /// Assemble clusters from the populated index.
    ///
    /// `signatures` is indexed by `file_index`; files without signatures
    /// never enter the graph and stay unclustered. Cluster ids are allocated
    /// in order of each component's smallest file index, members ascend, and
    /// edge enumeration is deterministic given file order.
    pub fn build(&self, index: &LshIndex, signatures: &[Option<Vec<u32>>], files: &mut [FileRecord]) -> Vec<Cluster> {
        let mut union_find = UnionFind::new(files.len());
        let mut retained: BTreeMap<(u32, u32), f64> = BTreeMap::new();
        let mut examined: BTreeSet<(u32, u32)> = BTreeSet::new();

        for (i, signature) in signatures.iter().enumerate() {
            let Some(signature) = signature else {
                continue;
            };
            let i = i as u32;

            for j in index.query(signature) {
                if j == i {
                    continue;
                }
                let key = (i.min(j), i.max(j));
                if !examined.insert(key) {
                    continue;
                }
                let Some(other) = signatures.get(j as usize).and_then(Option::as_ref) else {
                    continue;
                };

                let similarity = estimate_similarity(signature, other);
                if similarity >= self.similarity_threshold {
                    retained.insert(key, similarity);
                    union_find.union(key.0, key.1);
                }
            }
        }

        debug!(
            "retained {} of {} candidate edges",
            retained.len(),
            examined.len()
        );

        // Components of the pruned graph, keyed by their smallest member so
        // cluster ids come out in deterministic order.
        let mut components: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
        for &(a, b) in retained.keys() {
            for member in [a, b] {
                let root = union_find.find(member);
                let component = components.entry(root).or_default();
                if !component.contains(&member) {
                    component.push(member);
                }
            }
        }

        let mut grouped: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
        for (_, mut members) in components {
            members.sort_unstable();
            if members.len() >= 2 {
                grouped.insert(members[0], members);
            }
        }

        let mut clusters = Vec::with_capacity(grouped.len());
        for (cluster_id, (_, members)) in grouped.into_iter().enumerate() {
            let cluster_id = cluster_id as u32;
            let cluster = self.finish_cluster(cluster_id, members, &retained, files);
            for &member in &cluster.members {
                files[member as usize].cluster_id = Some(cluster_id);
                files[member as usize].in_cluster = true;
            }
            clusters.push(cluster);
        }

        clusters
    }

    fn finish_cluster(
        &self,
        cluster_id: u32,
        members: Vec<u32>,
        retained: &BTreeMap<(u32, u32), f64>,
        files: &[FileRecord],
    ) -> Cluster {
        let member_set: BTreeSet<u32> = members.iter().copied().collect();

        let similarity_pairs: Vec<SimilarityPair> = retained
            .iter()
            .filter(|((a, b), _)| member_set.contains(a) && member_set.contains(b))
            .map(|(&(a, b), &similarity)| SimilarityPair {
                file1_index: a,
                file2_index: b,
                similarity,
            })
            .collect();

        let avg_similarity = if similarity_pairs.is_empty() {
            0.0
        } else {
            similarity_pairs.iter().map(|p| p.similarity).sum::<f64>()
                / similarity_pairs.len() as f64
        };

        let marketplaces: BTreeSet<String> = members
            .iter()
            .map(|&m| files[m as usize].marketplace.clone())
            .collect();
        let has_official = members.iter().any(|&m| files[m as usize].is_official);
        let locations = members
            .iter()
            .map(|&m| files[m as usize].location())
            .collect();

        let cluster_type = self.classify(&members, &marketplaces, files);

        Cluster {
            cluster_id,
            cluster_type,
            size: members.len(),
            avg_similarity,
            has_official,
            marketplaces: marketplaces.into_iter().collect(),
            members,
            locations,
            similarity_pairs,
        }
    }

    /// Type is a pure function of the members' (marketplace, filename)
    /// distribution: scaffold beats the marketplace split.
    fn classify(
        &self,
        members: &[u32],
        marketplaces: &BTreeSet<String>,
        files: &[FileRecord],
    ) -> ClusterType {
        let shared_basename = members
            .windows(2)
            .all(|w| files[w[0] as usize].filename == files[w[1] as usize].filename);

        if members.len() >= self.scaffold_min_size && shared_basename {
            ClusterType::Scaffold
        } else if marketplaces.len() >= 2 {
            ClusterType::CrossMarketplace
        } else {
            ClusterType::Internal
        }
    }
}

/// Union-find with path halving and union by rank.
#[derive(Debug)]
struct UnionFind {
    parent: Vec<u32>,
    rank: Vec<u8>,
}

impl UnionFind {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len as u32).collect(),
            rank: vec![0; len],
        }
    }

    fn find(&mut self, mut x: u32) -> u32 {
        while self.parent[x as usize] != x {
            let grandparent = self.parent[self.parent[x as usize] as usize];
            self.parent[x as usize] = grandparent;
            x = grandparent;
        }
        x
    }

    fn union(&mut self, a: u32, b: u32) {
        let mut root_a = self.find(a);
        let mut root_b = self.find(b);
        if root_a == root_b {
            return;
        }
        if self.rank[root_a as usize] < self.rank[root_b as usize] {
            std::mem::swap(&mut root_a, &mut root_b);
        }
        self.parent[root_b as usize] = root_a;
        if self.rank[root_a as usize] == self.rank[root_b as usize] {
            self.rank[root_a as usize] += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::similarity::index::LshIndex;
    use crate::detectors::similarity::minhash::MinHasher;
    use crate::detectors::similarity::params::BandParams;
    use crate::detectors::similarity::shingles::ShingleGenerator;
    use crate::io::report::basename;

    fn record(index: u32, marketplace: &str, path: &str) -> FileRecord {
        FileRecord {
            file_index: index,
            marketplace: marketplace.to_string(),
            plugin: "p1".to_string(),
            path: path.to_string(),
            filename: basename(path).to_string(),
            is_official: marketplace.starts_with("anthropic"),
            cluster_id: None,
            in_cluster: false,
        }
    }

    /// Build signatures for document bodies and cluster them.
    fn cluster_documents(docs: &[(&str, &str, &str)]) -> (Vec<Cluster>, Vec<FileRecord>) {
        let generator = ShingleGenerator::new(3);
        let hasher = MinHasher::new(128, 1);
        let mut index = LshIndex::new(BandParams { bands: 32, rows: 4 });

        let mut files = Vec::new();
        let mut signatures = Vec::new();
        for (i, (marketplace, path, body)) in docs.iter().enumerate() {
            files.push(record(i as u32, marketplace, path));
            let signature = hasher.signature(&generator.shingles(body)).unwrap();
            index.insert(i as u32, &signature);
            signatures.push(Some(signature));
        }

        let clusters = ClusterBuilder::new(0.7, 20).build(&index, &signatures, &mut files);
        (clusters, files)
    }

    #[test]
    fn test_identical_pair_clusters() {
        let body = "the quick brown fox jumps over the lazy dog again and again";
        let (clusters, files) = cluster_documents(&[
            ("mA", "skills/x.md", body),
            ("mB", "skills/x.md", body),
        ]);

        assert_eq!(clusters.len(), 1);
        let cluster = &clusters[0];
        assert_eq!(cluster.members, vec![0, 1]);
        assert_eq!(cluster.cluster_type, ClusterType::CrossMarketplace);
        assert_eq!(cluster.avg_similarity, 1.0);
        assert_eq!(files[0].cluster_id, Some(0));
        assert_eq!(files[1].cluster_id, Some(0));
    }

    #[test]
    fn test_dissimilar_files_unclustered() {
        let (clusters, files) = cluster_documents(&[
            ("mA", "a.md", "completely original writing about distributed consensus algorithms"),
            ("mA", "b.md", "an unrelated recipe for sourdough bread with a long fermentation"),
        ]);

        assert!(clusters.is_empty());
        assert!(files.iter().all(|f| f.cluster_id.is_none()));
    }

    #[test]
    fn test_internal_cluster_type() {
        let body = "shared template body used by several plugins in one marketplace here";
        let (clusters, _) = cluster_documents(&[
            ("mA", "skills/one.md", body),
            ("mA", "skills/two.md", body),
            ("mA", "skills/three.md", body),
        ]);

        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].cluster_type, ClusterType::Internal);
        assert_eq!(clusters[0].marketplaces, vec!["mA".to_string()]);
    }

    #[test]
    fn test_scaffold_requires_shared_basename_and_floor() {
        let body = "standard skill scaffold body repeated across every generated plugin";
        let docs: Vec<(String, String)> = (0..25)
            .map(|i| (format!("mp{i}"), format!("skills/s{i}/SKILL.md")))
            .collect();
        let doc_refs: Vec<(&str, &str, &str)> = docs
            .iter()
            .map(|(m, p)| (m.as_str(), p.as_str(), body))
            .collect();

        let (clusters, _) = cluster_documents(&doc_refs);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].size, 25);
        assert_eq!(clusters[0].cluster_type, ClusterType::Scaffold);
    }

    #[test]
    fn test_below_scaffold_floor_is_cross_marketplace() {
        let body = "standard skill scaffold body repeated across a handful of plugins";
        let (clusters, _) = cluster_documents(&[
            ("mA", "skills/a/SKILL.md", body),
            ("mB", "skills/b/SKILL.md", body),
            ("mC", "skills/c/SKILL.md", body),
        ]);

        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].cluster_type, ClusterType::CrossMarketplace);
    }

    #[test]
    fn test_has_official_flag() {
        let body = "officially maintained content mirrored into a community marketplace";
        let (clusters, _) = cluster_documents(&[
            ("anthropic-agents", "skills/x.md", body),
            ("community", "skills/x.md", body),
        ]);

        assert_eq!(clusters.len(), 1);
        assert!(clusters[0].has_official);
    }

    #[test]
    fn test_similarity_pairs_cover_members() {
        let body = "three way duplicate content shared across sibling marketplaces today";
        let (clusters, _) = cluster_documents(&[
            ("mA", "x.md", body),
            ("mB", "x.md", body),
            ("mC", "x.md", body),
        ]);

        assert_eq!(clusters.len(), 1);
        let cluster = &clusters[0];
        assert_eq!(cluster.similarity_pairs.len(), 3);
        for pair in &cluster.similarity_pairs {
            assert!(cluster.members.contains(&pair.file1_index));
            assert!(cluster.members.contains(&pair.file2_index));
            assert!(pair.similarity >= 0.7);
        }
    }

    #[test]
    fn test_union_find_components() {
        let mut uf = UnionFind::new(6);
        uf.union(0, 1);
        uf.union(1, 2);
        uf.union(4, 5);

        assert_eq!(uf.find(0), uf.find(2));
        assert_eq!(uf.find(4), uf.find(5));
        assert_ne!(uf.find(0), uf.find(4));
        assert_eq!(uf.find(3), 3);
    }
}
