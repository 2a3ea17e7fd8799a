// PointFix batch driver, shared by the `ptfix` binary and its tests

pub mod batch;
