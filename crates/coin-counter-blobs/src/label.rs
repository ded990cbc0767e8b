//! Two-pass connected-component labeling (8-connectivity).
//!
//! Pass one walks the interior of the mask in raster order and looks at the
//! already visited neighbors
//!
//! ```text
//! A B C
//! D X
//! ```
//!
//! A pixel with no labeled neighbor opens a new provisional label; otherwise it
//! takes the smallest resolved neighbor label and all neighbor classes are
//! merged into it. Equivalences live in a union-find arena that is local to the
//! call and grows with the number of provisional labels. Pass two rewrites
//! every pixel to a dense label `1..=n`, numbered in order of each class's
//! smallest provisional label.

use coin_counter_core::Image;

use crate::blob::Blob;
use crate::error::BlobError;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Labeled mask: one `u32` per pixel, 0 is background.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelImage {
    width: usize,
    height: usize,
    labels: Vec<u32>,
}

impl LabelImage {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            labels: vec![0; width * height],
        }
    }

    /// Zeroed label image matching the size of `mask`.
    pub fn for_mask(mask: &Image) -> Self {
        Self::new(mask.width(), mask.height())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u32 {
        self.labels[self.index(x, y)]
    }

    #[inline]
    fn set(&mut self, x: usize, y: usize, label: u32) {
        let idx = self.index(x, y);
        self.labels[idx] = label;
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "label ({x}, {y}) outside {}x{}",
            self.width,
            self.height
        );
        y * self.width + x
    }
}

/// Union-find over provisional labels; the smaller root always wins, so the
/// canonical label of a class is its smallest member.
struct EquivalenceTable {
    parent: Vec<u32>,
}

impl EquivalenceTable {
    fn new() -> Self {
        // slot 0 is the background and never handed out
        Self { parent: vec![0] }
    }

    fn fresh(&mut self) -> Result<u32, BlobError> {
        let label = u32::try_from(self.parent.len()).map_err(|_| BlobError::LabelOverflow)?;
        self.parent.push(label);
        Ok(label)
    }

    fn len(&self) -> usize {
        self.parent.len() - 1
    }

    fn find(&mut self, label: u32) -> u32 {
        let mut root = label;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }
        let mut cur = label;
        while self.parent[cur as usize] != root {
            let next = self.parent[cur as usize];
            self.parent[cur as usize] = root;
            cur = next;
        }
        root
    }

    fn union(&mut self, a: u32, b: u32) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[hi as usize] = lo;
        }
    }

    /// Map every provisional label to its dense canonical label (1-based).
    fn resolve(mut self) -> (Vec<u32>, u32) {
        let mut dense = vec![0u32; self.parent.len()];
        let mut count = 0u32;
        for label in 1..self.parent.len() as u32 {
            let root = self.find(label);
            if root == label {
                count += 1;
                dense[label as usize] = count;
            } else {
                dense[label as usize] = dense[root as usize];
            }
        }
        (dense, count)
    }
}

/// Label the connected foreground regions of a single-channel mask.
///
/// Any non-zero mask value is foreground. Border pixels are treated as
/// background, so every region is fully enclosed. Returns one [`Blob`] per
/// region with only `label` set; an empty list means no foreground.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(src, dst), fields(width = src.width(), height = src.height()))
)]
pub fn label_blobs(src: &Image, dst: &mut LabelImage) -> Result<Vec<Blob>, BlobError> {
    if src.channels() != 1 {
        return Err(coin_counter_core::ImageError::ChannelMismatch {
            expected: 1,
            got: src.channels(),
        }
        .into());
    }
    if src.width() != dst.width || src.height() != dst.height {
        return Err(BlobError::LabelGeometry {
            width: src.width(),
            height: src.height(),
            got_width: dst.width,
            got_height: dst.height,
        });
    }

    dst.labels.fill(0);
    let (w, h) = (src.width(), src.height());
    if w < 3 || h < 3 {
        return Ok(Vec::new());
    }

    let mut table = EquivalenceTable::new();
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            if src.get(x, y, 0) == 0 {
                continue;
            }

            let neighbors = [
                dst.get(x - 1, y - 1),
                dst.get(x, y - 1),
                dst.get(x + 1, y - 1),
                dst.get(x - 1, y),
            ];

            let mut min_label: Option<u32> = None;
            for &n in neighbors.iter().filter(|&&n| n != 0) {
                let root = table.find(n);
                min_label = Some(min_label.map_or(root, |m| m.min(root)));
            }

            let label = match min_label {
                None => table.fresh()?,
                Some(m) => {
                    for &n in neighbors.iter().filter(|&&n| n != 0) {
                        table.union(n, m);
                    }
                    m
                }
            };
            dst.set(x, y, label);
        }
    }

    let provisional = table.len();
    let (dense, count) = table.resolve();
    for label in dst.labels.iter_mut().filter(|l| **l != 0) {
        *label = dense[*label as usize];
    }

    log::debug!("labeled {count} blobs ({provisional} provisional labels)");
    Ok((1..=count).map(Blob::with_label).collect())
}
