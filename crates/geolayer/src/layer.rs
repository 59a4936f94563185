use crate::{
    Area, Error, GeoTransform, PixelScale, RasterSample, Result, Window,
    rounding::{round_down_pixels, round_up_pixels},
};

/// Georeferencing metadata of a layer.
///
/// This part of the layer contract does not depend on the sample type so layers producing different
/// pixel types can be combined, e.g. in [`calculate_intersection`].
pub trait LayerExtent {
    /// The native geographic extent of the layer
    fn area(&self) -> Area;
    fn pixel_scale(&self) -> PixelScale;
    /// The pixel window the layer currently reads, relative to its native raster origin
    fn window(&self) -> Window;
    fn geo_transform(&self) -> GeoTransform;
    /// The area passed to the most recent [`Layer::set_area_of_interest`] call
    fn interest(&self) -> Option<Area>;
}

/// A source of pixel data with a fixed georeference.
///
/// Layers are immutable values, narrowing a layer creates a new layer sharing the same underlying source.
pub trait Layer: LayerExtent + Sized {
    type Sample: RasterSample;

    /// Creates a new layer reading only the pixels covering `area`.
    /// `area` must be expressed in the coordinate system of this layer.
    fn set_area_of_interest(&self, area: &Area) -> Result<Self>;

    /// Produces the pixels of `region`, expressed relative to the current window, and passes them to `consumer`
    /// together with the row stride of the buffer.
    ///
    /// The buffer only lives for the duration of the `consumer` call.
    fn with_data_at<R, F>(&self, region: &Window, consumer: F) -> Result<R>
    where
        F: FnOnce(&[Self::Sample], usize) -> Result<R>;

    /// Convenience wrapper around [`Layer::with_data_at`] that copies the pixels of `region` into an owned buffer.
    fn read_region(&self, region: &Window) -> Result<Vec<Self::Sample>> {
        self.with_data_at(region, |data, _stride| Ok(data.to_vec()))
    }
}

/// Calculates the window of a layer with extent `layer_area` that covers `area`.
///
/// Offsets are rounded down and sizes rounded up, ignoring fractions of a pixel that are smaller than
/// the minimal distance of interest.
pub fn window_for_area(layer_area: &Area, geo_transform: &GeoTransform, area: &Area) -> Window {
    let scale_x = geo_transform.pixel_size_x();
    let scale_y = -geo_transform.pixel_size_y();

    Window {
        xoff: round_down_pixels((area.left() - layer_area.left()) / scale_x, scale_x),
        yoff: round_down_pixels((layer_area.top() - area.top()) / scale_y, scale_y),
        xsize: round_up_pixels((area.right() - area.left()) / scale_x, scale_x),
        ysize: round_up_pixels((area.top() - area.bottom()) / scale_y, scale_y),
    }
}

/// Calculates the area covered by all the provided layers.
///
/// All layers must have the exact same pixel scale, no resampling is performed.
pub fn calculate_intersection(layers: &[&dyn LayerExtent]) -> Result<Area> {
    let Some(first) = layers.first() else {
        return Err(Error::NoLayersProvided);
    };

    let target_scale = first.pixel_scale();
    if layers.iter().any(|layer| layer.pixel_scale() != target_scale) {
        return Err(Error::LayersNotAtSameScale);
    }

    let (left, top, right, bottom) = layers.iter().map(|layer| layer.area()).fold(
        (f64::NEG_INFINITY, f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY),
        |(left, top, right, bottom), area| {
            (
                left.max(area.left()),
                top.min(area.top()),
                right.min(area.right()),
                bottom.max(area.bottom()),
            )
        },
    );

    if left >= right || bottom >= top {
        return Err(Error::NoIntersectionPossible);
    }

    log::debug!("Layer intersection: left {left} top {top} right {right} bottom {bottom}");
    Area::new(left, top, right, bottom)
}
