use serde::{Deserialize, Serialize};

/// One connected foreground region of a mask.
///
/// The labeler fills `label` only; [`compute_blob_info`](crate::compute_blob_info)
/// populates the geometry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Blob {
    pub label: u32,
    /// Bounding box, inclusive: `x..=xf`, `y..=yf`.
    pub x: usize,
    pub y: usize,
    pub xf: usize,
    pub yf: usize,
    pub width: usize,
    pub height: usize,
    /// Pixel count.
    pub area: usize,
    /// Centroid, truncated to whole pixels.
    pub xc: usize,
    pub yc: usize,
    /// Circumference of a circle whose diameter is the bounding box width.
    pub perimeter: usize,
}

impl Blob {
    pub fn with_label(label: u32) -> Self {
        Self {
            label,
            ..Self::default()
        }
    }

    /// Blob with only a bounding box set; centroid is the box center.
    pub fn from_bounding_box(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            xf: (x + width).saturating_sub(1),
            yf: (y + height).saturating_sub(1),
            width,
            height,
            xc: x + width / 2,
            yc: y + height / 2,
            ..Self::default()
        }
    }

    pub fn bounding_box_area(&self) -> usize {
        self.width * self.height
    }

    /// Axis-aligned bounding box intersection.
    pub fn overlaps(&self, other: &Blob) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_is_strict_on_touching_edges() {
        let a = Blob::from_bounding_box(10, 10, 20, 20);
        assert!(a.overlaps(&Blob::from_bounding_box(15, 15, 20, 20)));
        assert!(a.overlaps(&Blob::from_bounding_box(0, 0, 11, 11)));
        assert!(!a.overlaps(&Blob::from_bounding_box(30, 10, 5, 5)));
        assert!(!a.overlaps(&Blob::from_bounding_box(100, 100, 20, 20)));
    }

    #[test]
    fn bounding_box_fields_are_consistent() {
        let b = Blob::from_bounding_box(3, 4, 5, 6);
        assert_eq!((b.xf, b.yf), (7, 9));
        assert_eq!((b.xc, b.yc), (5, 7));
        assert_eq!(b.bounding_box_area(), 30);
    }

    #[test]
    fn serializes_flat_fields() {
        let b = Blob {
            area: 12,
            ..Blob::from_bounding_box(1, 2, 4, 3)
        };
        let json = serde_json::to_value(b).expect("json");
        assert_eq!(json["area"], 12);
        assert_eq!(json["xf"], 4);
        let back: Blob = serde_json::from_value(json).expect("blob");
        assert_eq!(back, b);
    }
}
