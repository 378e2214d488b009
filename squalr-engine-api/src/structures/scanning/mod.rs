pub mod op_type;
