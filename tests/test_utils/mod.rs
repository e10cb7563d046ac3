use coursemap_core::track_processor::RawPoint;

pub fn load_raw_course_data_for_test() -> Vec<RawPoint> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path("./tests/data/raw_course_city.csv")
        .unwrap();

    let mut data: Vec<RawPoint> = Vec::new();
    for row in reader.records() {
        let row = row.unwrap();
        data.push(RawPoint {
            longitude: row.get(0).unwrap().parse().unwrap(),
            latitude: row.get(1).unwrap().parse().unwrap(),
        });
    }
    data
}
