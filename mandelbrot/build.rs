fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "gpu")]
    {
        use spirv_builder::{Capability, MetadataPrintout, SpirvBuilder};

        SpirvBuilder::new("../shader", "spirv-unknown-spv1.5")
            .print_metadata(MetadataPrintout::Full)
            .capability(Capability::Float64)
            .build()?;
    }

    Ok(())
}
