pub mod equipment_commands;
pub mod spare_commands;
pub mod team_commands;
pub mod user_commands;
pub mod utils;
pub mod work_order_commands;
