/// Domain layer: workspace entities and the value objects they are built from
pub mod entities;
pub mod value_objects;
