// Tests for catalog ETL, the catalog cache and the build generator

#[cfg(test)]
mod test_helpers;



#[cfg(test)]
mod test_generator;
