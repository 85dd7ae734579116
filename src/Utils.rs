/// reading thermo libraries, phase catalogs and reaction lists from task documents
pub mod load_from_file;
