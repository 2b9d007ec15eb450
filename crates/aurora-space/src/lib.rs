//! Space backdrop: the procedural starfield and its point-sprite renderer.

pub mod starfield;

pub use starfield::{
    STAR_ATTEMPTS, STAR_COLOR, STAR_EXCLUSION_RADIUS, STAR_FIELD_HALF_EXTENT, STAR_POINT_SIZE,
    StarFieldGenerator, StarFieldRenderer, StarPointSet, StarUniforms,
};
