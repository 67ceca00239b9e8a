//! Corner-form boxes and IoU.

/// Corner-form axis-aligned box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl BBox {
    /// Creates a box from its corners.
    pub fn new(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Converts a center-size box to corner form.
    pub fn from_center(center_x: f32, center_y: f32, width: f32, height: f32) -> Self {
        let half_w = width / 2.0;
        let half_h = height / 2.0;
        Self {
            x_min: center_x - half_w,
            y_min: center_y - half_h,
            x_max: center_x + half_w,
            y_max: center_y + half_h,
        }
    }

    /// Width, clamped to zero for inverted boxes.
    pub fn width(&self) -> f32 {
        (self.x_max - self.x_min).max(0.0)
    }

    /// Height, clamped to zero for inverted boxes.
    pub fn height(&self) -> f32 {
        (self.y_max - self.y_min).max(0.0)
    }

    /// Area; inverted boxes have zero area.
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Multiplies x coordinates by `sx` and y coordinates by `sy`.
    pub fn scaled(&self, sx: f32, sy: f32) -> Self {
        Self {
            x_min: self.x_min * sx,
            y_min: self.y_min * sy,
            x_max: self.x_max * sx,
            y_max: self.y_max * sy,
        }
    }

    /// Area of the overlap between two boxes.
    pub fn intersection(&self, other: &BBox) -> f32 {
        let inter_w = (self.x_max.min(other.x_max) - self.x_min.max(other.x_min)).max(0.0);
        let inter_h = (self.y_max.min(other.y_max) - self.y_min.max(other.y_min)).max(0.0);
        inter_w * inter_h
    }

    /// Intersection over union; zero when the union is empty.
    pub fn iou(&self, other: &BBox) -> f32 {
        let inter = self.intersection(other);
        let union = self.area() + other.area() - inter;
        if union > 0.0 {
            inter / union
        } else {
            0.0
        }
    }

    /// Returns the corners as `[x_min, y_min, x_max, y_max]`.
    pub fn to_array(&self) -> [f32; 4] {
        [self.x_min, self.y_min, self.x_max, self.y_max]
    }
}

impl From<[f32; 4]> for BBox {
    fn from(v: [f32; 4]) -> Self {
        BBox::new(v[0], v[1], v[2], v[3])
    }
}
