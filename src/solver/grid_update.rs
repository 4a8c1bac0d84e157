use crate::core::Grid;
use crate::math::Real;

/// Grid update stage (clamps boundary nodes, then advances nodal velocities).
pub fn grid_update(grid: &mut Grid, dt: Real) {
    grid.apply_no_slip_boundary_conditions();
    grid.update_nodal_velocities(dt);
}
