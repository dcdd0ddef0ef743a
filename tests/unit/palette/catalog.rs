//! Tests for palette catalog entries

#[cfg(test)]
mod tests {
    use photomosaic::palette::{CatalogImage, ImageId};
    use photomosaic::raster::{Color, PixelBuffer};

    // Tests the average color is computed once at construction
    // Verified by storing the top-left pixel instead
    #[test]
    fn test_catalog_image_average() {
        let mut data = Vec::new();
        data.extend_from_slice(&[0, 0, 0, 255]);
        data.extend_from_slice(&[200, 100, 50, 255]);
        let pixels = PixelBuffer::new(2, 1, data).unwrap();

        let image = CatalogImage::new(ImageId(3), "tile.png", pixels).unwrap();

        assert_eq!(image.average(), Color::from_argb(255, 25, 50, 100));
        assert_eq!(image.id(), ImageId(3));
        assert_eq!(image.name(), "tile.png");
        assert_eq!(image.pixels().width(), 2);
    }

    // Tests ids display with a hash prefix and order numerically
    // Verified by comparing display strings
    #[test]
    fn test_image_id_display_and_order() {
        assert_eq!(ImageId(12).to_string(), "#12");
        assert!(ImageId(2) < ImageId(10));
    }
}
