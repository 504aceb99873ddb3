pub mod grad_flow;
pub mod tile_params;
