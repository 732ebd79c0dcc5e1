//! Integration tests for warpkit crates.
//!
//! End-to-end checks of the transform engine, the distortions and the
//! mesh warp driver, working through the public API only.

#[cfg(test)]
mod fixtures {
    use warpkit_core::PixelBuffer;

    /// Opaque pattern with distinct, non-linear channel values.
    pub fn pattern(w: u32, h: u32) -> PixelBuffer {
        PixelBuffer::from_fn(w, h, |x, y| {
            let r = (x * 37 + y * 11) % 256;
            let g = (x * x + 3 * y) % 256;
            let b = (y * 53) % 256;
            0xff000000 | (r << 16) | (g << 8) | b
        })
        .unwrap()
    }

    pub fn checkerboard(w: u32, h: u32) -> PixelBuffer {
        PixelBuffer::from_fn(w, h, |x, y| if (x + y) % 2 == 0 { 0xffffffff } else { 0xff000000 }).unwrap()
    }
}




#[cfg(test)]
mod serde_tests {
    use warpkit_ops::distort::{AffineWarp, Circle, Offset, Twirl};
    use warpkit_ops::{ControlGrid, EdgeAction, Interpolation, TransformOptions};

    #[test]
    fn test_options_from_partial_json() {
        let options: TransformOptions = serde_json::from_str(r#"{"edge_action":"wrap"}"#).unwrap();
        assert_eq!(options.edge_action, EdgeAction::Wrap);
        assert_eq!(options.interpolation, Interpolation::Bilinear);
    }

    #[test]
    fn test_grid_preset() {
        let mut grid = ControlGrid::new(3, 4, 64, 64).unwrap();
        grid.translate_point(1, 1, 2.5, -1.0).unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        let back: ControlGrid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid);

        let bad = r#"{"rows":1,"cols":2,"x":[0.0,1.0],"y":[0.0,0.0]}"#;
        assert!(serde_json::from_str::<ControlGrid>(bad).is_err());
    }

    #[test]
    fn test_distortion_presets() {
        let rotate = AffineWarp::rotate(0.3).with_resize(true);
        let back: AffineWarp = serde_json::from_str(&serde_json::to_string(&rotate).unwrap()).unwrap();
        assert_eq!(back, rotate);

        let twirl: Twirl = serde_json::from_str(r#"{"angle":1.5}"#).unwrap();
        assert_eq!(twirl, Twirl { angle: 1.5, ..Twirl::default() });

        let offset: Offset = serde_json::from_str(r#"{"x":-3}"#).unwrap();
        assert_eq!(offset, Offset::new(-3, 0));
        assert!(offset.wrap);

        let circle: Circle = serde_json::from_str(r#"{"radius":25.0}"#).unwrap();
        assert_eq!(circle, Circle { radius: 25.0, ..Circle::default() });
    }
}
