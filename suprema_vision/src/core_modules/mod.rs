pub mod animation;
pub mod authored;
pub mod boundary_path;
pub mod color_quantizer;
pub mod pixel;
pub mod placement;
pub mod raster;
pub mod region;
pub mod region_finder;
pub mod shape;
pub mod shape_classifier;
pub mod style_mapper;

#[cfg(test)]
pub(crate) mod test_rng;
