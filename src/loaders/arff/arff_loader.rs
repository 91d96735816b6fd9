use crate::core::instances::Instances;
use crate::error::CartError;
use crate::loaders::arff::parser::{LineReader, parse_header, parse_instance_values};
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

/// Reads a whole ARFF document into memory.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArffLoader;

impl ArffLoader {
    /// Loads `path`. `class_index` defaults to the last attribute.
    pub fn load(path: impl AsRef<Path>, class_index: Option<usize>) -> Result<Instances, CartError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let data = Self::from_reader(BufReader::new(file), class_index)?;
        debug!(
            "loaded {} instances with {} attributes from {}",
            data.len(),
            data.header().number_of_attributes(),
            path.display()
        );
        Ok(data)
    }

    pub fn from_reader<R: BufRead>(
        reader: R,
        class_index: Option<usize>,
    ) -> Result<Instances, CartError> {
        let mut lines = LineReader::new(reader);
        let header = Arc::new(parse_header(&mut lines, class_index)?);
        let mut data = Instances::new(header);

        while let Some(line) = lines.next_content_line()? {
            let (values, weight) = parse_instance_values(data.header(), &line, lines.line_no())?;
            data.add_values(values, weight);
        }
        Ok(data)
    }

    pub fn parse_str(text: &str, class_index: Option<usize>) -> Result<Instances, CartError> {
        Self::from_reader(text.as_bytes(), class_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::instances::Instance;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const WEATHER: &str = r#"% weather data
@relation weather
@attribute outlook {sunny, overcast, rainy}
@attribute temperature numeric
@attribute humidity numeric
@attribute windy {TRUE, FALSE}
@attribute play {yes, no}

@data
sunny,85,85,FALSE,no
sunny,80,90,TRUE,no
overcast,83,86,FALSE,yes,{2}
rainy,70,96,FALSE,yes
?,75,?,TRUE,yes
"#;

    fn write_arff(contents: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().expect("tempfile");
        f.write_all(contents.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn loads_header_rows_and_weights() {
        let tf = write_arff(WEATHER);
        let data = ArffLoader::load(tf.path(), None).unwrap();

        let h = data.header();
        assert_eq!(h.relation_name(), "weather");
        assert_eq!(h.number_of_attributes(), 5);
        assert_eq!(h.class_index(), 4);
        assert_eq!(data.len(), 5);
        assert_eq!(data.instance(0).to_vec(), vec![0.0, 85.0, 85.0, 1.0, 1.0]);
        assert_eq!(data.instance(2).weight(), 2.0);
        assert!((data.sum_of_weights() - 6.0).abs() < 1e-12);

        let last = data.instance(4);
        assert!(last.is_missing_at_index(0));
        assert!(last.is_missing_at_index(2));
        assert!(!last.is_missing_at_index(1));
    }

    #[test]
    fn explicit_class_index_is_used() {
        let data = ArffLoader::parse_str(WEATHER, Some(0)).unwrap();
        assert_eq!(data.class_index(), 0);
        assert_eq!(data.number_of_classes(), 3);
    }

    #[test]
    fn bad_row_reports_its_line_number() {
        let text = "@relation r\n@attribute a numeric\n@attribute c {x,y}\n@data\n1,x\n\nfoo,y\n";
        match ArffLoader::parse_str(text, None).unwrap_err() {
            CartError::Parse { line, .. } => assert_eq!(line, 7),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ArffLoader::load(dir.path().join("absent.arff"), None).unwrap_err();
        assert!(matches!(err, CartError::Io(_)));
    }
}
