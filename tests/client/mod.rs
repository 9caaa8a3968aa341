mod nexon;
mod sheets;
mod token;
