use std::collections::BTreeMap;

use frameplot_animation_core::{
    Animation, Line, LineOptions, Title, TitleTemplate, TitleValue,
};
use frameplot_canvas_core::{Artist, Scene, Style};
use frameplot_test_fixtures::datasets;
use ndarray::{Array1, Array2};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Wave {
    t: Vec<f64>,
    x: Vec<f64>,
    y: Vec<Vec<f64>>,
}

impl Wave {
    fn y_array(&self) -> Array2<f64> {
        let cols = self.x.len();
        let flat: Vec<f64> = self.y.iter().flatten().copied().collect();
        Array2::from_shape_vec((self.y.len(), cols), flat).unwrap()
    }
}

#[derive(Debug, Deserialize)]
struct TitleCases {
    cases: Vec<TitleCase>,
}

#[derive(Debug, Deserialize)]
struct TitleCase {
    template: String,
    fields: BTreeMap<String, Vec<TitleValue>>,
    expected: Vec<String>,
}

/// it should animate a wave over its own timeline with a broadcast x
#[test]
fn sine_wave_plays_through() {
    let wave: Wave = datasets::load("sine-wave").unwrap();
    let (mut scene, ax) = Scene::with_axes();
    let y = wave.y_array();
    let block = Line::new(
        &mut scene,
        ax,
        Array1::from(wave.x.clone()),
        y.clone(),
        LineOptions::default(),
    )
    .unwrap();
    let mut anim = Animation::new(vec![block.into()], wave.t.clone()).unwrap();
    assert_eq!(anim.len(), wave.t.len());

    for frame in 0..anim.len() {
        anim.tick(&mut scene).unwrap();
        match scene.artists(ax)[0] {
            Artist::Line { x, y: shown, .. } => {
                assert_eq!(x.to_vec(), wave.x);
                assert_eq!(shown, &y.row(frame));
            }
            _ => unreachable!(),
        }
    }
}

/// it should render every template case to the expected titles
#[test]
fn title_templates_render() {
    let suite: TitleCases = datasets::load("title-cases").unwrap();
    assert!(!suite.cases.is_empty());
    for case in suite.cases {
        let template = case
            .fields
            .into_iter()
            .fold(TitleTemplate::new(&case.template), |t, (name, values)| {
                t.field(name, values)
            });
        let (mut scene, ax) = Scene::with_axes();
        let title = Title::from_template(&mut scene, ax, template, Style::default()).unwrap();
        assert_eq!(title.titles(), case.expected.as_slice(), "template {}", case.template);
        assert_eq!(scene.title(ax), Some(case.expected[0].as_str()));
    }
}
