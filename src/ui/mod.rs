/// UI layer: panels (filters, menu) and chart rendering. Everything here
/// consumes the pipeline's `VizPackage` bundles; no pipeline logic lives in
/// this module.
pub mod panels;
pub mod plot;
