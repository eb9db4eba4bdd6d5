use ndarray::{arr1, arr2, Array3, Array4, Axis};

use crate::fixtures::Fixture;
use crate::internal_prelude::*;

/// `dimensions.h5`: float datasets of rank 0, 1 and 2.
#[derive(Clone, Debug)]
pub struct Dimensions {
    file_name: String,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self { file_name: "dimensions.h5".into() }
    }
}

impl_options!(Dimensions { file_name: &str });

impl Fixture for Dimensions {
    fn output(&self) -> &str {
        &self.file_name
    }

    fn write(&self, storage: &dyn Storage) -> Result<()> {
        DatasetBuilder::new(storage).with_scalar(&42.0_f64).create("scalar_dataset")?;
        DatasetBuilder::new(storage)
            .with_data(&arr1(&[1.0_f64, 2.0, 3.0, 4.0, 5.0]))
            .create("1d_dataset")?;
        DatasetBuilder::new(storage)
            .with_data(&arr2(&[[1.1_f64, 2.2, 3.3], [4.4, 5.5, 6.6]]))
            .create("2d_dataset")?;
        let permuted = DatasetBuilder::new(storage)
            .with_data(&arr2(&[[7.7_f64, 8.8], [9.9, 10.0], [11.1, 12.2]]))
            .create("2d_dataset_permuted")?;
        permuted.new_attr_builder().with_data(&[1_i32, 0]).create("permutation_index")?;
        info!(file = %self.file_name, "dimension datasets written");
        Ok(())
    }
}

/// Moves of the 4-D tic-tac-toe game as `(x, y, z, player)`, one per step.
const MOVES: [(usize, usize, usize, i32); 5] =
    [(0, 0, 0, 1), (1, 0, 0, 2), (0, 0, 1, 1), (1, 1, 0, 2), (0, 0, 2, 1)];

/// `tictactoe_4d_state.h5`: a 3x3x3 board recorded after each move.
#[derive(Clone, Debug)]
pub struct TicTacToe {
    file_name: String,
    dataset_name: String,
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self { file_name: "tictactoe_4d_state.h5".into(), dataset_name: "game".into() }
    }
}

impl_options!(TicTacToe { file_name: &str, dataset_name: &str });

impl TicTacToe {
    /// Board states indexed as `[x, y, z, step]`.
    pub fn states(&self) -> Array4<i32> {
        let mut states = Array4::zeros((3, 3, 3, MOVES.len()));
        for (step, &(x, y, z, player)) in MOVES.iter().enumerate() {
            if step > 0 {
                let previous = states.index_axis(Axis(3), step - 1).to_owned();
                states.index_axis_mut(Axis(3), step).assign(&previous);
            }
            states[[x, y, z, step]] = player;
        }
        states
    }
}

impl Fixture for TicTacToe {
    fn output(&self) -> &str {
        &self.file_name
    }

    fn write(&self, storage: &dyn Storage) -> Result<()> {
        let states = self.states();
        DatasetBuilder::new(storage).with_data(&states).create(&self.dataset_name)?;
        info!(dataset = %self.dataset_name, shape = ?states.shape(), "dataset written");
        Ok(())
    }
}

/// `sales_cube.h5`: a time x zip x product cube of sales figures.
#[derive(Clone, Debug)]
pub struct SalesCube {
    file_name: String,
    dataset_name: String,
    extent: usize,
}

impl Default for SalesCube {
    fn default() -> Self {
        Self { file_name: "sales_cube.h5".into(), dataset_name: "sales".into(), extent: 3 }
    }
}

impl_options!(SalesCube { file_name: &str, dataset_name: &str, extent: usize });

impl SalesCube {
    pub fn cube(&self) -> Array3<f64> {
        let n = self.extent;
        Array3::from_shape_fn((n, n, n), |(t, z, p)| (t + z + p) as f64 * 100.0)
    }
}

impl Fixture for SalesCube {
    fn output(&self) -> &str {
        &self.file_name
    }

    fn write(&self, storage: &dyn Storage) -> Result<()> {
        DatasetBuilder::new(storage).with_data(&self.cube()).create(&self.dataset_name)?;
        info!(dataset = %self.dataset_name, extent = self.extent, "dataset written");
        Ok(())
    }
}
