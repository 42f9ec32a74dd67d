use imbrush::FramePhase;

#[test]
fn a_frame_cycles_through_every_phase_in_order() {
    let mut phase = FramePhase::Idle;
    let expected = [
        FramePhase::PollingEvents,
        FramePhase::BuildingFrame,
        FramePhase::Translating,
        FramePhase::Presenting,
        FramePhase::Idle,
    ];
    for want in expected {
        phase = phase.next();
        assert_eq!(phase, want);
    }
}
