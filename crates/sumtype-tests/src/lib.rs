//! Fixture types generated by `build.rs` from the files under `decls/`.

pub mod shapes {
    include!(concat!(env!("OUT_DIR"), "/shapes.rs"));
}

pub mod outcomes {
    include!(concat!(env!("OUT_DIR"), "/outcomes.rs"));
}
