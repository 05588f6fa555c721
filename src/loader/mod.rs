// Startup data loading

pub mod seed_loader;
