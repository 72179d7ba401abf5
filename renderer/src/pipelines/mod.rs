//====================================================================

pub mod texture_pipeline;

//====================================================================
